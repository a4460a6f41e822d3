use std::fmt;
use std::str::FromStr;

use snafu::Snafu;

/// Money amount in minor units (grosze).
///
/// Arithmetic and comparisons happen on the integer minor-unit value;
/// the currency formatting exists only at the text boundary. The
/// canonical text form carries the currency suffix — `5 zł` for whole
/// amounts, `12.50 zł` otherwise — and parsing additionally accepts a
/// bare decimal or integer, since older clients send the price as a
/// plain number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

const CURRENCY_SUFFIX: &str = "zł";

impl Price {
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    pub const fn minor(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Invalid price: {input:?}"))]
pub struct PriceParseError {
    input: String,
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.0 / 100;
        let minor = self.0 % 100;
        if minor == 0 {
            write!(f, "{major} {CURRENCY_SUFFIX}")
        } else {
            write!(f, "{major}.{minor:02} {CURRENCY_SUFFIX}")
        }
    }
}

impl FromStr for Price {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PriceParseSnafu { input: s }.build();

        let amount = s
            .trim()
            .strip_suffix(CURRENCY_SUFFIX)
            .map(str::trim_end)
            .unwrap_or_else(|| s.trim());
        if amount.is_empty() {
            return Err(err());
        }

        let (major, minor) = match amount.split_once(['.', ',']) {
            None => (amount, None),
            Some((major, minor)) => (major, Some(minor)),
        };

        let major: u64 = major.parse().map_err(|_| err())?;
        let minor: u64 = match minor {
            None => 0,
            // One fractional digit means tenths: "5.5" is 5 zł 50 gr.
            Some(m) if m.len() == 1 => m.parse::<u64>().map_err(|_| err())? * 10,
            Some(m) if m.len() == 2 => m.parse().map_err(|_| err())?,
            Some(_) => return Err(err()),
        };

        Ok(Self(major * 100 + minor))
    }
}

impl serde::Serialize for Price {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Price {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PriceVisitor;

        impl serde::de::Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a price string like \"12.50 zł\" or a number of złoty")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Price::from_minor(v * 100))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u64::try_from(v)
                    .map(|v| Price::from_minor(v * 100))
                    .map_err(|_| E::custom("price must be a non-negative number"))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if !v.is_finite() || v < 0.0 {
                    return Err(E::custom("price must be a non-negative number"));
                }
                Ok(Price::from_minor((v * 100.0).round() as u64))
            }
        }

        d.deserialize_any(PriceVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_amounts_without_fraction() {
        assert_eq!(Price::from_minor(500).to_string(), "5 zł");
        assert_eq!(Price::from_minor(1250).to_string(), "12.50 zł");
        assert_eq!(Price::from_minor(1205).to_string(), "12.05 zł");
        assert_eq!(Price::from_minor(0).to_string(), "0 zł");
    }

    #[test]
    fn parses_suffixed_and_bare_forms() {
        assert_eq!("5 zł".parse::<Price>().expect("parses").minor(), 500);
        assert_eq!("12.50 zł".parse::<Price>().expect("parses").minor(), 1250);
        assert_eq!("12,50".parse::<Price>().expect("parses").minor(), 1250);
        assert_eq!("7".parse::<Price>().expect("parses").minor(), 700);
        assert_eq!("5.5".parse::<Price>().expect("parses").minor(), 550);
        assert_eq!("  3.99 zł ".parse::<Price>().expect("parses").minor(), 399);
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "zł", "abc", "1.234", "-5", "5 z"] {
            assert!(input.parse::<Price>().is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn text_form_round_trips() {
        for minor in [0, 1, 99, 100, 500, 1250, 123456] {
            let price = Price::from_minor(minor);
            let parsed: Price = price.to_string().parse().expect("parses own display");
            assert_eq!(price, parsed);
        }
    }

    #[test]
    fn serde_accepts_numbers_from_older_clients() {
        assert_eq!(
            serde_json::from_str::<Price>("12.5").expect("deserializes"),
            Price::from_minor(1250)
        );
        assert_eq!(
            serde_json::from_str::<Price>("7").expect("deserializes"),
            Price::from_minor(700)
        );
        assert_eq!(
            serde_json::from_str::<Price>("\"12.50 zł\"").expect("deserializes"),
            Price::from_minor(1250)
        );
        assert_eq!(
            serde_json::to_string(&Price::from_minor(500)).expect("serializes"),
            "\"5 zł\""
        );
    }
}
