//! Substance rate table and dose-scaled effect curves.
//!
//! Literature constants:
//! - Elvanse: Hutson et al. 2017, Ermer et al. 2016
//! - Medikinet IR: Kim et al. 2017, Markowitz et al. 2000
//! - Medikinet retard (fasted, single peak): Haessler et al. 2008
//! - Caffeine: Kamimori et al. 2002, Seng et al. 2009 (non-smoker t1/2 ~4.3h)

use crate::curve::normalized_level;
use crate::{Error, RateConstants, Result, Substance};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub const ELVANSE: RateConstants = RateConstants::new(0.78, 0.088, 40.0);
pub const MEDIKINET_IR: RateConstants = RateConstants::new(1.72, 0.28, 10.0);
pub const MEDIKINET_RETARD: RateConstants = RateConstants::new(1.2, 0.28, 30.0);
/// Lamate: 23mg/100ml x 330ml ~ 76mg per can
pub const CAFFEINE: RateConstants = RateConstants::new(2.5, 0.16, 76.0);

/// Rate constants for every tracked substance
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct RateTable {
    #[serde(default = "default_elvanse")]
    pub elvanse: RateConstants,

    #[serde(default = "default_medikinet")]
    pub medikinet: RateConstants,

    #[serde(default = "default_medikinet_retard")]
    pub medikinet_retard: RateConstants,

    #[serde(default = "default_mate")]
    pub mate: RateConstants,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            elvanse: ELVANSE,
            medikinet: MEDIKINET_IR,
            medikinet_retard: MEDIKINET_RETARD,
            mate: CAFFEINE,
        }
    }
}

fn default_elvanse() -> RateConstants {
    ELVANSE
}

fn default_medikinet() -> RateConstants {
    MEDIKINET_IR
}

fn default_medikinet_retard() -> RateConstants {
    MEDIKINET_RETARD
}

fn default_mate() -> RateConstants {
    CAFFEINE
}

impl RateTable {
    /// Constants bound to a substance, `None` for `Other`
    pub fn get(&self, substance: Substance) -> Option<&RateConstants> {
        match substance {
            Substance::Elvanse => Some(&self.elvanse),
            Substance::Medikinet => Some(&self.medikinet),
            Substance::MedikinetRetard => Some(&self.medikinet_retard),
            Substance::Mate => Some(&self.mate),
            Substance::Other => None,
        }
    }

    /// Check every entry for `ka > ke > 0` and a positive reference dose
    pub fn validate(&self) -> Result<()> {
        for substance in Substance::TRACKED {
            if let Some(rates) = self.get(substance) {
                validate_rates(substance, rates)?;
            }
        }
        Ok(())
    }
}

fn validate_rates(substance: Substance, rates: &RateConstants) -> Result<()> {
    let RateConstants {
        ka,
        ke,
        reference_dose_mg,
    } = *rates;

    if !(ka.is_finite() && ke.is_finite() && ke > 0.0 && ka > ke) {
        return Err(Error::Config(format!(
            "{}: rate constants need ka > ke > 0 (ka={}, ke={})",
            substance, ka, ke
        )));
    }
    if !(reference_dose_mg.is_finite() && reference_dose_mg > 0.0) {
        return Err(Error::Config(format!(
            "{}: reference_dose_mg must be positive, got {}",
            substance, reference_dose_mg
        )));
    }
    Ok(())
}

/// Validated rate table bound to the Bateman curve
#[derive(Clone, Debug, PartialEq)]
pub struct SubstanceCurveLibrary {
    rates: RateTable,
}

/// Literature library, built once and shared read-only
static DEFAULT_LIBRARY: Lazy<SubstanceCurveLibrary> = Lazy::new(|| SubstanceCurveLibrary {
    rates: RateTable::default(),
});

/// Get a reference to the shared literature-parameterized library
pub fn default_library() -> &'static SubstanceCurveLibrary {
    &DEFAULT_LIBRARY
}

impl SubstanceCurveLibrary {
    /// Bind a rate table, rejecting constants that violate `ka > ke > 0`
    pub fn new(rates: RateTable) -> Result<Self> {
        rates.validate()?;
        Ok(Self { rates })
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Reference dose for a substance (`None` for untracked substances)
    pub fn reference_dose(&self, substance: Substance) -> Option<f64> {
        self.rates.get(substance).map(|r| r.reference_dose_mg)
    }

    /// Normalized level scaled linearly by `dose_mg / reference_dose_mg`.
    ///
    /// Untracked substances have no curve and yield 0.
    pub fn effect(&self, substance: Substance, hours_since_intake: f64, dose_mg: f64) -> f64 {
        match self.rates.get(substance) {
            Some(rates) => {
                let dose_factor = dose_mg / rates.reference_dose_mg;
                normalized_level(hours_since_intake, rates.ka, rates.ke) * dose_factor
            }
            None => 0.0,
        }
    }
}
