//! Flow file names
//!
//! The solver tools name flow condition files after the case they run:
//! `M085Re19p8ma-1p00.dat` is Mach 0.85 at -1.00 degrees, with `p` standing
//! in for the decimal point.

use crate::error::{Result, VfpError};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static FLOW_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<stem>.*M(?P<mach>\d{3}).*?)ma(?P<aoa>[-+]?\d+p\d+)(?i:\.dat)$")
        .unwrap_or_else(|e| unreachable!("flow file name pattern rejected: {e}"))
});

/// A decoded `M<mach*100><rest>ma<aoa>.dat` file name
#[derive(Debug, Clone, PartialEq)]
pub struct FlowFileName {
    stem: String,
    mach: f64,
    aoa: f64,
}

impl FlowFileName {
    pub fn parse(name: &str) -> Result<Self> {
        let caps = FLOW_NAME.captures(name).ok_or_else(|| VfpError::FileName {
            name: name.to_string(),
            reason: "expected M<mach><rest>ma<aoa>.dat".to_string(),
        })?;

        let mach_code: f64 = caps["mach"].parse().map_err(|_| VfpError::FileName {
            name: name.to_string(),
            reason: format!("bad Mach code '{}'", &caps["mach"]),
        })?;
        let aoa = decode_angle(&caps["aoa"]).ok_or_else(|| VfpError::FileName {
            name: name.to_string(),
            reason: format!("bad angle '{}'", &caps["aoa"]),
        })?;

        Ok(Self {
            stem: caps["stem"].to_string(),
            mach: mach_code / 100.0,
            aoa,
        })
    }

    pub fn mach(&self) -> f64 {
        self.mach
    }

    pub fn aoa(&self) -> f64 {
        self.aoa
    }

    /// Everything before the `ma<aoa>` suffix
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// File name for the same case at another angle of attack
    pub fn with_aoa(&self, aoa: f64) -> String {
        format!("{}ma{}.dat", self.stem, encode_angle(aoa))
    }
}

impl fmt::Display for FlowFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.with_aoa(self.aoa))
    }
}

/// `-1p25` -> -1.25
pub(crate) fn decode_angle(token: &str) -> Option<f64> {
    token.replace('p', ".").parse().ok()
}

/// -1.25 -> `-1p25`, 0.5 -> `+0p50`
pub(crate) fn encode_angle(aoa: f64) -> String {
    let sign = if aoa < 0.0 { '-' } else { '+' };
    format!("{sign}{:.2}", aoa.abs()).replace('.', "p")
}
