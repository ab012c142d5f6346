use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("invalid customer id: {0} (must be positive)")]
    InvalidCustomerId(u64),

    #[error("unknown {kind} '{value}', expected one of: {expected}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: String,
    },
}

/// Opaque positive customer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct CustomerId(u64);

impl CustomerId {
    pub fn new(id: u64) -> Result<Self, JobError> {
        if id == 0 {
            return Err(JobError::InvalidCustomerId(id));
        }
        Ok(Self(id))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<NonZeroU64> for CustomerId {
    fn from(id: NonZeroU64) -> Self {
        Self(id.get())
    }
}

impl TryFrom<u64> for CustomerId {
    type Error = JobError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CustomerId> for u64 {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalize an enum name for case-insensitive matching ("to-the-max" == "ToTheMax")
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Declares a closed discriminator enum with `ALL`, `as_str`, `Display` and a
/// lenient `FromStr`.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal { $($variant:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = JobError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| normalize(v.as_str()) == wanted)
                    .ok_or_else(|| JobError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

closed_enum! {
    /// Vehicle manufacturer. Informational only, never used for dispatch.
    CarMake, "car make" { Ford, Chevy, Toyota, Honda, Tesla, Subaru }
}

closed_enum! {
    /// Primary service level; selects exactly one wash handler
    WashTier, "wash tier" { Basic, Awesome, ToTheMax }
}

closed_enum! {
    /// Optional supplementary service
    Addon, "addon" { TireShine, InteriorClean, HandWaxAndShine }
}

/// One customer's car wash work order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    customer_id: CustomerId,
    make: CarMake,
    wash_tier: WashTier,
    #[serde(default)]
    addons: Vec<Addon>,
}

impl Job {
    pub fn new(
        customer_id: CustomerId,
        make: CarMake,
        wash_tier: WashTier,
        addons: impl IntoIterator<Item = Addon>,
    ) -> Self {
        Self {
            customer_id,
            make,
            wash_tier,
            addons: addons.into_iter().collect(),
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn make(&self) -> CarMake {
        self.make
    }

    pub fn wash_tier(&self) -> WashTier {
        self.wash_tier
    }

    /// Add-ons exactly as requested, repeats included
    pub fn addons(&self) -> &[Addon] {
        &self.addons
    }

    /// Distinct add-ons in order of first occurrence
    pub fn distinct_addons(&self) -> Vec<Addon> {
        let mut seen = HashSet::with_capacity(self.addons.len());
        self.addons
            .iter()
            .copied()
            .filter(|addon| seen.insert(*addon))
            .collect()
    }

    pub fn requests_addon(&self, addon: Addon) -> bool {
        self.addons.contains(&addon)
    }
}
