mod batch;
mod check;
mod convert;
mod validate;
