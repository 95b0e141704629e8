//! Units carried by flow records. Every unit wraps a totally ordered `f64`, so records can be
//! sorted and compared directly.

use ordered_float::OrderedFloat;

macro_rules! unit {
    ($name: ident, $suffix: literal) => {
        #[derive(
            Debug,
            Default,
            Copy,
            Clone,
            PartialOrd,
            Ord,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(OrderedFloat<f64>);

        impl $name {
            pub const ZERO: $name = Self::new(0.0);

            pub const fn new(value: f64) -> Self {
                Self(OrderedFloat(value))
            }

            pub const fn into_f64(self) -> f64 {
                self.0 .0
            }
        }

        impl From<f64> for $name {
            fn from(value: f64) -> Self {
                Self::new(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}{}", self.0, $suffix)
            }
        }
    };
}

unit!(MetersPerSec, "m/s");
unit!(Kbps, "kbps");
unit!(Millisecs, "ms");
unit!(Percent, "%");
