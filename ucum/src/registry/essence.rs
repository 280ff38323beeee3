//! Bundled subset of the UCUM essence table.

use super::{
    BaseUnit, DefinedUnit, Prefix, Registry, SpecialFunction, UnitClass, UnitDefinition,
};
use crate::decimal::Decimal;
use crate::dimension::Dimension;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

static SHARED: Lazy<Arc<EssenceRegistry>> = Lazy::new(|| Arc::new(EssenceRegistry::new()));

const PREFIXES: &[(&str, &str, &str)] = &[
    ("Y", "yotta", "1e24"),
    ("Z", "zetta", "1e21"),
    ("E", "exa", "1e18"),
    ("P", "peta", "1e15"),
    ("T", "tera", "1e12"),
    ("G", "giga", "1e9"),
    ("M", "mega", "1e6"),
    ("k", "kilo", "1e3"),
    ("h", "hecto", "1e2"),
    ("da", "deka", "1e1"),
    ("d", "deci", "1e-1"),
    ("c", "centi", "1e-2"),
    ("m", "milli", "1e-3"),
    ("u", "micro", "1e-6"),
    ("n", "nano", "1e-9"),
    ("p", "pico", "1e-12"),
    ("f", "femto", "1e-15"),
    ("a", "atto", "1e-18"),
    ("z", "zepto", "1e-21"),
    ("y", "yocto", "1e-24"),
    ("Ki", "kibi", "1024"),
    ("Mi", "mebi", "1048576"),
    ("Gi", "gibi", "1073741824"),
    ("Ti", "tebi", "1099511627776"),
];

const BASE_UNITS: &[(&str, &str, Dimension, &str)] = &[
    ("m", "meter", Dimension::Length, "length"),
    ("s", "second", Dimension::Time, "time"),
    ("g", "gram", Dimension::Mass, "mass"),
    ("rad", "radian", Dimension::PlaneAngle, "plane angle"),
    ("K", "kelvin", Dimension::Temperature, "temperature"),
    ("C", "coulomb", Dimension::ElectricCharge, "electric charge"),
    ("cd", "candela", Dimension::LuminousIntensity, "luminous intensity"),
];

const PRINT_SYMBOLS: &[(&str, &str)] = &[
    ("10*", "10"),
    ("10^", "10"),
    ("[pi]", "π"),
    ("[ppth]", "ppth"),
    ("[ppm]", "ppm"),
    ("sr", "sr"),
    ("Ohm", "Ω"),
    ("Cel", "°C"),
    ("deg", "°"),
    ("'", "'"),
    ("''", "''"),
    ("l", "l"),
    ("L", "L"),
    ("min", "min"),
    ("h", "h"),
    ("d", "d"),
    ("a", "a"),
    ("wk", "wk"),
    ("mo", "mo"),
    ("[c]", "c"),
    ("[h]", "h"),
    ("[k]", "k"),
    ("[e]", "e"),
    ("[g]", "gn"),
    ("[in_i]", "in"),
    ("[ft_i]", "ft"),
    ("[yd_i]", "yd"),
    ("[mi_i]", "mi"),
    ("[nmi_i]", "n.mi"),
    ("[kn_i]", "knot"),
    ("[lb_av]", "lb"),
    ("[oz_av]", "oz"),
    ("[gr]", "gr"),
    ("[gal_us]", "gal"),
    ("[degF]", "°F"),
    ("[degR]", "°R"),
    ("[degRe]", "°Ré"),
    ("m[H2O]", "m HO2"),
    ("m[Hg]", "m Hg"),
    ("[p'diop]", "PD"),
    ("%[slope]", "%"),
    ("[pH]", "pH"),
    ("Ao", "Å"),
    ("Np", "Np"),
    ("B", "B"),
    ("B[SPL]", "B(SPL)"),
    ("By", "B"),
    ("[psi]", "psi"),
];

#[derive(Clone, Copy)]
enum Class {
    Derived,
    Dimless,
    Arbitrary,
    /// Function name; value and unit are the row's value and unit
    Special(&'static str),
}

struct Row {
    code: &'static str,
    name: &'static str,
    metric: bool,
    class: Class,
    value: &'static str,
    unit: &'static str,
    property: &'static str,
}

const fn derived(
    code: &'static str,
    name: &'static str,
    metric: bool,
    value: &'static str,
    unit: &'static str,
    property: &'static str,
) -> Row {
    Row {
        code,
        name,
        metric,
        class: Class::Derived,
        value,
        unit,
        property,
    }
}

const fn dimless(
    code: &'static str,
    name: &'static str,
    value: &'static str,
    unit: &'static str,
    property: &'static str,
) -> Row {
    Row {
        code,
        name,
        metric: false,
        class: Class::Dimless,
        value,
        unit,
        property,
    }
}

const fn special(
    code: &'static str,
    name: &'static str,
    metric: bool,
    function: &'static str,
    value: &'static str,
    unit: &'static str,
    property: &'static str,
) -> Row {
    Row {
        code,
        name,
        metric,
        class: Class::Special(function),
        value,
        unit,
        property,
    }
}

const fn arbitrary(code: &'static str, name: &'static str, metric: bool, property: &'static str) -> Row {
    Row {
        code,
        name,
        metric,
        class: Class::Arbitrary,
        value: "1",
        unit: "1",
        property,
    }
}

#[rustfmt::skip]
const UNITS: &[Row] = &[
    // dimensionless
    dimless("10*", "the number ten for arbitrary powers", "10", "1", "number"),
    dimless("10^", "the number ten for arbitrary powers", "10", "1", "number"),
    dimless("[pi]", "the number pi", "3.1415926535897932384626433832795028841971693993751058209749445923", "1", "number"),
    dimless("%", "percent", "1", "10*-2", "fraction"),
    dimless("[ppth]", "parts per thousand", "1", "10*-3", "fraction"),
    dimless("[ppm]", "parts per million", "1", "10*-6", "fraction"),
    dimless("[ppb]", "parts per billion", "1", "10*-9", "fraction"),
    dimless("[pptr]", "parts per trillion", "1", "10*-12", "fraction"),
    // SI
    derived("mol", "mole", true, "6.02214076", "10*23", "amount of substance"),
    derived("sr", "steradian", true, "1", "rad2", "solid angle"),
    derived("Hz", "hertz", true, "1", "s-1", "frequency"),
    derived("N", "newton", true, "1", "kg.m/s2", "force"),
    derived("Pa", "pascal", true, "1", "N/m2", "pressure"),
    derived("J", "joule", true, "1", "N.m", "energy"),
    derived("W", "watt", true, "1", "J/s", "power"),
    derived("A", "ampère", true, "1", "C/s", "electric current"),
    derived("V", "volt", true, "1", "J/C", "electric potential"),
    derived("F", "farad", true, "1", "C/V", "electric capacitance"),
    derived("Ohm", "ohm", true, "1", "V/A", "electric resistance"),
    derived("S", "siemens", true, "1", "Ohm-1", "electric conductance"),
    derived("Wb", "weber", true, "1", "V.s", "magnetic flux"),
    special("Cel", "degree Celsius", true, "Cel", "1", "K", "temperature"),
    derived("T", "tesla", true, "1", "Wb/m2", "magnetic flux density"),
    derived("H", "henry", true, "1", "Wb/A", "inductance"),
    derived("lm", "lumen", true, "1", "cd.sr", "luminous flux"),
    derived("lx", "lux", true, "1", "lm/m2", "illuminance"),
    derived("Bq", "becquerel", true, "1", "s-1", "radioactivity"),
    derived("Gy", "gray", true, "1", "J/kg", "energy dose"),
    derived("Sv", "sievert", true, "1", "J/kg", "dose equivalent"),
    // ISO 1000
    derived("gon", "gon", false, "0.9", "deg", "plane angle"),
    derived("deg", "degree", false, "2", "[pi].rad/360", "plane angle"),
    derived("'", "minute", false, "1", "deg/60", "plane angle"),
    derived("''", "second", false, "1", "'/60", "plane angle"),
    derived("l", "liter", true, "1", "dm3", "volume"),
    derived("L", "liter", true, "1", "l", "volume"),
    derived("ar", "are", true, "100", "m2", "area"),
    derived("min", "minute", false, "60", "s", "time"),
    derived("h", "hour", false, "60", "min", "time"),
    derived("d", "day", false, "24", "h", "time"),
    derived("a_t", "tropical year", false, "365.24219", "d", "time"),
    derived("a_j", "mean Julian year", false, "365.25", "d", "time"),
    derived("a_g", "mean Gregorian year", false, "365.2425", "d", "time"),
    derived("a", "year", false, "1", "a_j", "time"),
    derived("wk", "week", false, "7", "d", "time"),
    derived("mo_s", "synodal month", false, "29.53059", "d", "time"),
    derived("mo_j", "mean Julian month", false, "1", "a_j/12", "time"),
    derived("mo_g", "mean Gregorian month", false, "1", "a_g/12", "time"),
    derived("mo", "month", false, "1", "mo_j", "time"),
    derived("t", "tonne", true, "1e3", "kg", "mass"),
    derived("bar", "bar", true, "1e5", "Pa", "pressure"),
    derived("u", "unified atomic mass unit", true, "1.6605402e-24", "g", "mass"),
    derived("eV", "electronvolt", true, "1", "[e].V", "energy"),
    derived("AU", "astronomic unit", false, "149597.870691", "Mm", "length"),
    derived("pc", "parsec", true, "3.085678e16", "m", "length"),
    // natural units
    derived("[c]", "velocity of light", true, "299792458", "m/s", "velocity"),
    derived("[h]", "Planck constant", true, "6.62607015e-34", "J.s", "action"),
    derived("[k]", "Boltzmann constant", true, "1.380649e-23", "J/K", "(unclassified)"),
    derived("[eps_0]", "permittivity of vacuum", true, "8.854187817e-12", "F/m", "electric permittivity"),
    derived("[mu_0]", "permeability of vacuum", true, "1", "4.[pi].10*-7.N/A2", "magnetic permeability"),
    derived("[e]", "elementary charge", true, "1.602176634e-19", "C", "electric charge"),
    derived("[m_e]", "electron mass", true, "9.1093837e-28", "g", "mass"),
    derived("[m_p]", "proton mass", true, "1.6726219e-24", "g", "mass"),
    derived("[G]", "Newtonian constant of gravitation", true, "6.67430e-11", "m3.kg-1.s-2", "(unclassified)"),
    derived("[g]", "standard acceleration of free fall", true, "9.80665", "m/s2", "acceleration"),
    derived("atm", "standard atmosphere", false, "101325", "Pa", "pressure"),
    derived("[ly]", "light-year", true, "1", "[c].a_j", "length"),
    derived("gf", "gram-force", true, "1", "g.[g]", "force"),
    derived("[lbf_av]", "pound force", false, "1", "[lb_av].[g]", "force"),
    // CGS
    derived("Ky", "Kayser", true, "1", "cm-1", "lineic number"),
    derived("Gal", "Gal", true, "1", "cm/s2", "acceleration"),
    derived("dyn", "dyne", true, "1", "g.cm/s2", "force"),
    derived("erg", "erg", true, "1", "dyn.cm", "energy"),
    derived("P", "Poise", true, "1", "dyn.s/cm2", "dynamic viscosity"),
    derived("Bi", "Biot", true, "10", "A", "electric current"),
    derived("St", "Stokes", true, "1", "cm2/s", "kinematic viscosity"),
    derived("Mx", "Maxwell", true, "1e-8", "Wb", "flux of magnetic induction"),
    derived("G", "Gauss", true, "1e-4", "T", "magnetic flux density"),
    derived("Oe", "Oersted", true, "250", "/[pi].A/m", "magnetic field intensity"),
    derived("Gb", "Gilbert", true, "1", "Oe.cm", "magnetic tension"),
    derived("sb", "stilb", true, "1", "cd/cm2", "lum. intensity density"),
    derived("Lmb", "Lambert", true, "1", "cd/cm2/[pi]", "brightness"),
    derived("ph", "phot", true, "1e-4", "lx", "illuminance"),
    derived("Ci", "Curie", true, "3.7e10", "Bq", "radioactivity"),
    derived("R", "Roentgen", true, "2.58e-4", "C/kg", "ion dose"),
    derived("RAD", "radiation absorbed dose", true, "100", "erg/g", "energy dose"),
    derived("REM", "radiation equivalent man", true, "1", "RAD", "dose equivalent"),
    // international customary
    derived("[in_i]", "inch", false, "2.54", "cm", "length"),
    derived("[ft_i]", "foot", false, "12", "[in_i]", "length"),
    derived("[yd_i]", "yard", false, "3", "[ft_i]", "length"),
    derived("[mi_i]", "mile", false, "5280", "[ft_i]", "length"),
    derived("[fth_i]", "fathom", false, "6", "[ft_i]", "depth of water"),
    derived("[nmi_i]", "nautical mile", false, "1852", "m", "length"),
    derived("[kn_i]", "knot", false, "1", "[nmi_i]/h", "velocity"),
    derived("[sin_i]", "square inch", false, "1", "[in_i]2", "area"),
    derived("[sft_i]", "square foot", false, "1", "[ft_i]2", "area"),
    derived("[syd_i]", "square yard", false, "1", "[yd_i]2", "area"),
    derived("[cin_i]", "cubic inch", false, "1", "[in_i]3", "volume"),
    derived("[cft_i]", "cubic foot", false, "1", "[ft_i]3", "volume"),
    derived("[cyd_i]", "cubic yard", false, "1", "[yd_i]3", "volume"),
    derived("[mil_i]", "mil", false, "1e-3", "[in_i]", "length"),
    derived("[hd_i]", "hand", false, "4", "[in_i]", "height of horses"),
    derived("[smoot]", "smoot", false, "67", "[in_i]", "length"),
    // US and British volumes
    derived("[gal_us]", "Queen Anne's wine gallon", false, "231", "[in_i]3", "fluid volume"),
    derived("[bbl_us]", "barrel", false, "42", "[gal_us]", "fluid volume"),
    derived("[qt_us]", "quart", false, "1", "[gal_us]/4", "fluid volume"),
    derived("[pt_us]", "pint", false, "1", "[qt_us]/2", "fluid volume"),
    derived("[gil_us]", "gill", false, "1", "[pt_us]/4", "fluid volume"),
    derived("[foz_us]", "fluid ounce", false, "1", "[gil_us]/4", "fluid volume"),
    derived("[fdr_us]", "fluid dram", false, "1", "[foz_us]/8", "fluid volume"),
    derived("[tbs_us]", "tablespoon", false, "1", "[foz_us]/2", "volume"),
    derived("[tsp_us]", "teaspoon", false, "1", "[tbs_us]/3", "volume"),
    derived("[cup_us]", "cup", false, "16", "[tbs_us]", "volume"),
    derived("[gal_br]", "gallon", false, "4.54609", "l", "volume"),
    derived("[qt_br]", "quart", false, "1", "[gal_br]/4", "volume"),
    derived("[pt_br]", "pint", false, "1", "[qt_br]/2", "volume"),
    // avoirdupois
    derived("[gr]", "grain", false, "64.79891", "mg", "mass"),
    derived("[lb_av]", "pound", false, "7000", "[gr]", "mass"),
    derived("[oz_av]", "ounce", false, "1", "[lb_av]/16", "mass"),
    derived("[dr_av]", "dram", false, "1", "[oz_av]/16", "mass"),
    derived("[stone_av]", "stone", false, "14", "[lb_av]", "mass"),
    derived("[ston_av]", "short ton", false, "2000", "[lb_av]", "mass"),
    derived("[lton_av]", "long ton", false, "2240", "[lb_av]", "mass"),
    derived("[car_m]", "metric carat", false, "0.2", "g", "mass"),
    derived("[car_Au]", "carat of gold alloys", false, "1", "/24", "mass fraction"),
    // heat
    special("[degF]", "degree Fahrenheit", false, "degF", "5", "K/9", "temperature"),
    derived("[degR]", "degree Rankine", false, "5", "K/9", "temperature"),
    special("[degRe]", "degree Réaumur", false, "degRe", "5", "K/4", "temperature"),
    derived("cal_[15]", "calorie at 15 °C", true, "4.18580", "J", "energy"),
    derived("cal_[20]", "calorie at 20 °C", true, "4.18190", "J", "energy"),
    derived("cal_m", "mean calorie", true, "4.19002", "J", "energy"),
    derived("cal_IT", "international table calorie", true, "4.1868", "J", "energy"),
    derived("cal_th", "thermochemical calorie", true, "4.184", "J", "energy"),
    derived("cal", "calorie", true, "1", "cal_th", "energy"),
    derived("[Cal]", "nutrition label Calories", false, "1", "kcal_th", "energy"),
    derived("[Btu_th]", "thermochemical British thermal unit", false, "1.054350", "kJ", "energy"),
    derived("[Btu_IT]", "international table British thermal unit", false, "1.05505585262", "kJ", "energy"),
    derived("[Btu]", "British thermal unit", false, "1", "[Btu_th]", "energy"),
    derived("[HP]", "horsepower", false, "550", "[ft_i].[lbf_av]/s", "power"),
    derived("[psi]", "pound per square inch", false, "1", "[lbf_av]/[in_i]2", "pressure"),
    derived("att", "technical atmosphere", false, "1", "kgf/cm2", "pressure"),
    // clinical
    derived("m[H2O]", "meter of water column", true, "9.80665", "kPa", "pressure"),
    derived("m[Hg]", "meter of mercury column", true, "133.3220", "kPa", "pressure"),
    derived("[in_i'H2O]", "inch of water column", false, "1", "m[H2O].[in_i]/m", "pressure"),
    derived("[in_i'Hg]", "inch of mercury column", false, "1", "m[Hg].[in_i]/m", "pressure"),
    derived("[PRU]", "peripheral vascular resistance unit", false, "1", "mm[Hg].s/ml", "fluid resistance"),
    derived("[diop]", "diopter", false, "1", "/m", "refraction of a lens"),
    special("[p'diop]", "prism diopter", false, "tanTimes100", "1", "rad", "refraction of a prism"),
    special("%[slope]", "percent of slope", false, "100tan", "1", "deg", "slope"),
    derived("[mesh_i]", "mesh", false, "1", "/[in_i]", "lineic number"),
    derived("[Ch]", "Charrière, french", false, "1", "mm/3", "gauge of catheters"),
    derived("[drp]", "drop", false, "1", "ml/20", "volume"),
    special("[hp'_X]", "homeopathic potency of decimal series (retired)", false, "hpX", "1", "1", "homeopathic potency (retired)"),
    special("[hp'_C]", "homeopathic potency of centesimal series (retired)", false, "hpC", "1", "1", "homeopathic potency (retired)"),
    special("[hp'_M]", "homeopathic potency of millesimal series (retired)", false, "hpM", "1", "1", "homeopathic potency (retired)"),
    special("[hp'_Q]", "homeopathic potency of quintamillesimal series (retired)", false, "hpQ", "1", "1", "homeopathic potency (retired)"),
    arbitrary("[hp_X]", "homeopathic potency of decimal hahnemannian series", false, "homeopathic potency (Hahnemann)"),
    derived("eq", "equivalents", true, "1", "mol", "amount of substance"),
    derived("osm", "osmole", true, "1", "mol", "amount of substance (dissolved particles)"),
    special("[pH]", "pH", false, "pH", "1", "mol/l", "acidity"),
    derived("g%", "gram percent", true, "1", "g/dl", "mass concentration"),
    derived("[S]", "Svedberg unit", false, "1", "10*-13.s", "sedimentation coefficient"),
    derived("[HPF]", "high power field", false, "1", "1", "view area in microscope"),
    derived("[LPF]", "low power field", false, "100", "1", "view area in microscope"),
    derived("kat", "katal", true, "1", "mol/s", "catalytic activity"),
    derived("U", "Unit", true, "1", "umol/min", "catalytic activity"),
    arbitrary("[iU]", "international unit", true, "arbitrary"),
    arbitrary("[IU]", "international unit", true, "arbitrary"),
    arbitrary("[arb'U]", "arbitrary unit", false, "arbitrary"),
    arbitrary("[USP'U]", "United States Pharmacopeia unit", false, "arbitrary"),
    arbitrary("[CFU]", "colony forming units", false, "number"),
    // levels
    special("Np", "neper", true, "ln", "1", "1", "level"),
    special("B", "bel", true, "lg", "1", "1", "level"),
    special("B[SPL]", "bel sound pressure", true, "lgTimes2", "2", "10*-5.Pa", "pressure level"),
    special("B[V]", "bel volt", true, "lgTimes2", "1", "V", "electric potential level"),
    special("B[mV]", "bel millivolt", true, "lgTimes2", "1", "mV", "electric potential level"),
    special("B[uV]", "bel microvolt", true, "lgTimes2", "1", "uV", "electric potential level"),
    special("B[10.nV]", "bel 10 nanovolt", true, "lgTimes2", "10", "nV", "electric potential level"),
    special("B[W]", "bel watt", true, "lg", "1", "W", "power level"),
    special("B[kW]", "bel kilowatt", true, "lg", "1", "kW", "power level"),
    // miscellaneous
    derived("st", "stere", true, "1", "m3", "volume"),
    derived("Ao", "Ångström", false, "0.1", "nm", "length"),
    derived("b", "barn", false, "100", "fm2", "action area"),
    derived("mho", "mho", true, "1", "S", "electric conductance"),
    derived("circ", "circle", false, "2", "[pi].rad", "plane angle"),
    derived("sph", "spere", false, "4", "[pi].sr", "solid angle"),
    // information
    special("bit_s", "bit", false, "ld", "1", "1", "amount of information"),
    derived("bit", "bit", true, "1", "1", "amount of information"),
    derived("By", "byte", true, "8", "bit", "amount of information"),
    derived("Bd", "baud", true, "1", "/s", "signal transmission rate"),
    special("[m/s2/Hz^(1/2)]", "meter per square seconds per square root of hertz", false, "sqrt", "1", "m2/s4/Hz", "amplitude spectral density"),
];

/// Registry over the bundled definition tables
#[derive(Debug, Clone)]
pub struct EssenceRegistry {
    units: HashMap<String, UnitDefinition>,
    prefixes: HashMap<String, Arc<Prefix>>,
}

impl Default for EssenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EssenceRegistry {
    pub fn new() -> Self {
        let symbols: HashMap<&str, &str> = PRINT_SYMBOLS.iter().copied().collect();

        let mut prefixes = HashMap::new();
        for (code, name, value) in PREFIXES {
            match Decimal::exact(value) {
                Ok(value) => {
                    prefixes.insert(
                        code.to_string(),
                        Arc::new(Prefix {
                            code: code.to_string(),
                            name: name.to_string(),
                            value,
                        }),
                    );
                }
                Err(e) => error!(prefix = code, "skipping bundled prefix: {}", e),
            }
        }

        let mut units = HashMap::new();
        for (code, name, dimension, property) in BASE_UNITS {
            units.insert(
                code.to_string(),
                UnitDefinition::Base(Arc::new(BaseUnit {
                    code: code.to_string(),
                    name: name.to_string(),
                    print_symbol: Some(code.to_string()),
                    dimension: *dimension,
                    property: property.to_string(),
                })),
            );
        }
        for row in UNITS {
            match Decimal::exact(row.value) {
                Ok(magnitude) => {
                    let definition = row.to_definition(magnitude, symbols.get(row.code).copied());
                    units.insert(row.code.to_string(), UnitDefinition::Defined(Arc::new(definition)));
                }
                Err(e) => error!(unit = row.code, "skipping bundled unit: {}", e),
            }
        }

        Self { units, prefixes }
    }

    /// Process-wide default instance, built on first use
    pub fn shared() -> Arc<EssenceRegistry> {
        Arc::clone(&SHARED)
    }
}

impl Row {
    fn to_definition(&self, magnitude: Decimal, print_symbol: Option<&str>) -> DefinedUnit {
        let class = match self.class {
            Class::Derived => UnitClass::Derived,
            Class::Dimless => UnitClass::Dimless,
            Class::Arbitrary => UnitClass::Arbitrary,
            Class::Special(function) => UnitClass::Special(SpecialFunction {
                name: function.to_string(),
                value: magnitude.clone(),
                unit: self.unit.to_string(),
            }),
        };
        DefinedUnit {
            code: self.code.to_string(),
            name: self.name.to_string(),
            print_symbol: print_symbol.map(str::to_string),
            metric: self.metric,
            class,
            magnitude,
            base_form: self.unit.to_string(),
            property: self.property.to_string(),
        }
    }
}

impl Registry for EssenceRegistry {
    fn lookup_unit(&self, code: &str) -> Option<UnitDefinition> {
        self.units.get(code).cloned()
    }

    fn lookup_prefix(&self, code: &str) -> Option<Arc<Prefix>> {
        self.prefixes.get(code).cloned()
    }

    fn units(&self) -> Vec<UnitDefinition> {
        self.units.values().cloned().collect()
    }
}
