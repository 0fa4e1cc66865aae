//! Response shapes shared between resource modules, plus the serde helpers Porkbun's loosely-typed JSON needs.

use std::net::IpAddr;

use serde::Deserialize;

/// Response returned by Porkbun's `/ping` endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PingResponse {
    pub your_ip: IpAddr,
}

/// Response for endpoints that report nothing beyond their `status`.
///
/// An empty, but non-unit, struct is needed to get serde to accept the (otherwise empty) object left over once the
/// status has been stripped.
#[derive(Debug, Deserialize)]
pub(crate) struct Ack {}

/// A `serde(with)` module for numbers that Porkbun sometimes sends as JSON numbers and sometimes as strings.
pub(crate) mod number_or_string {
    use serde::{Deserializer, Serializer, de};

    #[derive(Debug)]
    struct Visitor;

    impl<'de> de::Visitor<'de> for Visitor {
        type Value = u64;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a non-negative integer or a string containing one")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            u64::try_from(v).map_err(|_| de::Error::custom("integer out of range"))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.trim().parse().map_err(de::Error::custom)
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(Visitor)
    }

    pub fn serialize<S>(val: &u64, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_u64(*val)
    }
}

/// A `serde(with)` module that deserializes any primitive (or `null`) into a string.
///
/// Porkbun returns TTLs, priorities and flags as strings on some endpoints and as numbers on others; keeping them as
/// the API's own strings avoids guessing at a numeric type the API never commits to. `null` becomes `""`.
pub(crate) mod primitive_as_string {
    use serde::{Deserializer, Serializer, de};

    #[derive(Debug)]
    struct Visitor;

    #[rustfmt::skip]
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a primitive value, a string, or null")
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> { Ok(v) }
        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> { Ok(v.to_string()) }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> { Ok(v.to_string()) }
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> { Ok(v.to_string()) }
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> { Ok(v.to_string()) }
        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> { Ok(v.to_string()) }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> { Ok(String::new()) }
        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> { Ok(String::new()) }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(Visitor)
    }

    pub fn serialize<S>(val: &str, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(val)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Loose {
        #[serde(with = "primitive_as_string")]
        text: String,
        #[serde(with = "number_or_string")]
        number: u64,
    }

    fn loose(text: serde_json::Value, number: serde_json::Value) -> serde_json::Result<Loose> {
        serde_json::from_value(json!({ "text": text, "number": number }))
    }

    #[test]
    fn primitives_become_strings() {
        assert_eq!(loose(json!("600"), json!(1)).unwrap().text, "600");
        assert_eq!(loose(json!(600), json!(1)).unwrap().text, "600");
        assert_eq!(loose(json!(-3), json!(1)).unwrap().text, "-3");
        assert_eq!(loose(json!(true), json!(1)).unwrap().text, "true");
        assert_eq!(loose(json!(null), json!(1)).unwrap().text, "");
    }

    #[test]
    fn numbers_accept_strings() {
        assert_eq!(loose(json!(""), json!(106926659)).unwrap().number, 106926659);
        assert_eq!(loose(json!(""), json!("106926659")).unwrap().number, 106926659);
        assert!(loose(json!(""), json!(-1)).is_err());
        assert!(loose(json!(""), json!("abc")).is_err());
        assert!(loose(json!(""), json!([1])).is_err());
    }

    #[test]
    fn ack_accepts_leftover_fields() {
        let _: Ack = serde_json::from_value(json!({})).unwrap();
        let _: Ack = serde_json::from_value(json!({ "unexpected": 1 })).unwrap();
    }

    #[test]
    fn ping_reads_camel_case_address() {
        let ping: PingResponse = serde_json::from_value(json!({ "yourIp": "2001:db8::1" })).unwrap();
        assert_eq!(ping.your_ip, "2001:db8::1".parse::<IpAddr>().unwrap());
    }
}
