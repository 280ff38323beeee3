//! Feature flags and engine configuration.

use crate::resource_limits::ResourceLimits;
use serde::{Deserialize, Serialize};

/// Switches that change which expressions are valid and how they convert.
///
/// Flags take part in every cache key since identical text can validate
/// differently under two flag sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Allow prefixes on non-metric units such as `k[in_i]`
    pub prefix_on_non_metric: bool,
    /// Allow `(m.s){annotation}`
    pub annotation_after_parens: bool,
    /// Allow conversion between amount of substance and mass given a molar mass
    pub mol_mass_conversion: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            prefix_on_non_metric: false,
            annotation_after_parens: false,
            mol_mass_conversion: true,
        }
    }
}

impl FeatureFlags {
    const PREFIX_ON_NON_METRIC: u8 = 1;
    const MOL_MASS_CONVERSION: u8 = 1 << 1;
    const ANNOTATION_AFTER_PARENS: u8 = 1 << 2;

    /// Every flag enabled, used when parsing bundled definitions
    pub fn permissive() -> Self {
        Self {
            prefix_on_non_metric: true,
            annotation_after_parens: true,
            mol_mass_conversion: true,
        }
    }

    pub fn bitmask(&self) -> u8 {
        let mut mask = 0;
        if self.prefix_on_non_metric {
            mask |= Self::PREFIX_ON_NON_METRIC;
        }
        if self.mol_mass_conversion {
            mask |= Self::MOL_MASS_CONVERSION;
        }
        if self.annotation_after_parens {
            mask |= Self::ANNOTATION_AFTER_PARENS;
        }
        mask
    }
}

/// Everything an [`Engine`](crate::Engine) needs besides its registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub flags: FeatureFlags,
    pub limits: ResourceLimits,
    /// Entries kept by the default in-memory cache
    pub cache_capacity: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            flags: FeatureFlags::default(),
            limits: ResourceLimits::default(),
            cache_capacity: 10_000,
        }
    }
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    config: Configuration,
}

impl ConfigurationBuilder {
    pub fn flags(mut self, flags: FeatureFlags) -> Self {
        self.config.flags = flags;
        self
    }

    pub fn prefix_on_non_metric(mut self, enabled: bool) -> Self {
        self.config.flags.prefix_on_non_metric = enabled;
        self
    }

    pub fn annotation_after_parens(mut self, enabled: bool) -> Self {
        self.config.flags.annotation_after_parens = enabled;
        self
    }

    pub fn mol_mass_conversion(mut self, enabled: bool) -> Self {
        self.config.flags.mol_mass_conversion = enabled;
        self
    }

    pub fn limits(mut self, limits: ResourceLimits) -> Self {
        self.config.limits = limits;
        self
    }

    pub fn cache_capacity(mut self, capacity: u64) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    pub fn build(self) -> Configuration {
        self.config
    }
}
