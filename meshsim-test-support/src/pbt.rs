//! Environment-driven tuning for property-based test suites.
//!
//! Case counts and process forking differ between local runs and CI, so the
//! profile reads shared `MESHSIM_PBT_*` overrides once and hands every suite
//! the same resolved view.

use std::env;

/// Environment variable overriding the number of proptest cases per property.
pub const MESHSIM_PBT_CASES_ENV_KEY: &str = "MESHSIM_PBT_CASES";
/// Environment variable toggling proptest subprocess forking.
pub const MESHSIM_PBT_FORK_ENV_KEY: &str = "MESHSIM_PBT_FORK";

/// Resolved execution profile for a property-test suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Loads the profile, favouring environment overrides over the supplied
    /// defaults. Malformed overrides are logged and ignored rather than
    /// failing the suite.
    ///
    /// # Examples
    ///
    /// ```
    /// use meshsim_test_support::pbt::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: load_cases(default_cases),
            fork: load_fork(default_fork),
        }
    }

    /// Number of cases each property should execute.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether properties should run in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn load_cases(default: u32) -> u32 {
    let Ok(raw) = env::var(MESHSIM_PBT_CASES_ENV_KEY) else {
        return default;
    };
    match raw.trim().parse::<u32>() {
        Ok(cases) if cases > 0 => cases,
        Ok(_) => {
            warn_override(MESHSIM_PBT_CASES_ENV_KEY, &raw, "case count must be positive");
            default
        }
        Err(_) => {
            warn_override(MESHSIM_PBT_CASES_ENV_KEY, &raw, "expected an unsigned integer");
            default
        }
    }
}

fn load_fork(default: bool) -> bool {
    let Ok(raw) = env::var(MESHSIM_PBT_FORK_ENV_KEY) else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => true,
        "0" | "false" | "no" => false,
        _ => {
            warn_override(MESHSIM_PBT_FORK_ENV_KEY, &raw, "expected a boolean toggle");
            default
        }
    }
}

fn warn_override(key: &str, raw: &str, reason: &str) {
    tracing::warn!(
        env = key,
        raw = %raw,
        reason = reason,
        "ignoring malformed proptest override",
    );
}
