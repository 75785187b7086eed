//! Transport product kinds and admissible-product sets.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a product name is not a known HAFAS product.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport product: {0}")]
pub struct UnknownProduct(pub String);

/// A transport product as reported by the journey API.
///
/// The wire names are the HAFAS product ids used by transport.rest
/// (`suburban`, `nationalExpress`, ...). Both the `journeys` query flags
/// and the `line.product` field of responses use them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransportProduct {
    /// S-Bahn
    Suburban,
    /// U-Bahn
    Subway,
    /// Tram
    Tram,
    /// Bus
    Bus,
    /// Ferry
    Ferry,
    /// Express bus / IC bus
    Express,
    /// RB / RE
    Regional,
    /// IC / EC
    National,
    /// ICE
    NationalExpress,
    /// On-demand taxi services
    Taxi,
}

impl TransportProduct {
    /// Every known product, in query-flag order.
    pub const ALL: [TransportProduct; 10] = [
        TransportProduct::Suburban,
        TransportProduct::Subway,
        TransportProduct::Tram,
        TransportProduct::Bus,
        TransportProduct::Ferry,
        TransportProduct::Express,
        TransportProduct::Regional,
        TransportProduct::National,
        TransportProduct::NationalExpress,
        TransportProduct::Taxi,
    ];

    /// Parse a wire product name.
    ///
    /// `regionalExpress` is folded into `Regional`; some HAFAS profiles
    /// report it separately but never accept it as a query flag.
    pub fn parse(s: &str) -> Result<Self, UnknownProduct> {
        match s {
            "suburban" => Ok(TransportProduct::Suburban),
            "subway" => Ok(TransportProduct::Subway),
            "tram" => Ok(TransportProduct::Tram),
            "bus" => Ok(TransportProduct::Bus),
            "ferry" => Ok(TransportProduct::Ferry),
            "express" => Ok(TransportProduct::Express),
            "regional" | "regionalExpress" => Ok(TransportProduct::Regional),
            "national" => Ok(TransportProduct::National),
            "nationalExpress" => Ok(TransportProduct::NationalExpress),
            "taxi" => Ok(TransportProduct::Taxi),
            other => Err(UnknownProduct(other.to_string())),
        }
    }

    /// The wire name, as used in query parameters.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransportProduct::Suburban => "suburban",
            TransportProduct::Subway => "subway",
            TransportProduct::Tram => "tram",
            TransportProduct::Bus => "bus",
            TransportProduct::Ferry => "ferry",
            TransportProduct::Express => "express",
            TransportProduct::Regional => "regional",
            TransportProduct::National => "national",
            TransportProduct::NationalExpress => "nationalExpress",
            TransportProduct::Taxi => "taxi",
        }
    }
}

impl fmt::Display for TransportProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of transport products, typically the admissible set of a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSet(BTreeSet<TransportProduct>);

impl ProductSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rail-bound urban and regional products: S-Bahn, U-Bahn, regional trains.
    pub fn rail() -> Self {
        [
            TransportProduct::Suburban,
            TransportProduct::Subway,
            TransportProduct::Regional,
        ]
        .into_iter()
        .collect()
    }

    /// Add a product.
    pub fn with(mut self, product: TransportProduct) -> Self {
        self.0.insert(product);
        self
    }

    /// Returns true if the product is in the set.
    pub fn contains(&self, product: TransportProduct) -> bool {
        self.0.contains(&product)
    }

    /// Iterate over the products in the set.
    pub fn iter(&self) -> impl Iterator<Item = TransportProduct> + '_ {
        self.0.iter().copied()
    }

    /// Number of products in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no product is admissible.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One `(name, enabled)` flag per known product, for the journeys query.
    pub fn query_flags(&self) -> Vec<(&'static str, bool)> {
        TransportProduct::ALL
            .iter()
            .map(|p| (p.as_str(), self.contains(*p)))
            .collect()
    }
}

impl FromIterator<TransportProduct> for ProductSet {
    fn from_iter<I: IntoIterator<Item = TransportProduct>>(iter: I) -> Self {
        ProductSet(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wire_names() {
        assert_eq!(
            TransportProduct::parse("suburban"),
            Ok(TransportProduct::Suburban)
        );
        assert_eq!(
            TransportProduct::parse("nationalExpress"),
            Ok(TransportProduct::NationalExpress)
        );
        assert_eq!(
            TransportProduct::parse("regionalExpress"),
            Ok(TransportProduct::Regional)
        );
        assert!(TransportProduct::parse("Suburban").is_err());
        assert!(TransportProduct::parse("hovercraft").is_err());
    }

    #[test]
    fn wire_name_roundtrip() {
        for product in TransportProduct::ALL {
            assert_eq!(TransportProduct::parse(product.as_str()), Ok(product));
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&TransportProduct::NationalExpress).unwrap();
        assert_eq!(json, "\"nationalExpress\"");
    }

    #[test]
    fn rail_set() {
        let rail = ProductSet::rail();
        assert_eq!(rail.len(), 3);
        assert!(rail.contains(TransportProduct::Suburban));
        assert!(rail.contains(TransportProduct::Subway));
        assert!(rail.contains(TransportProduct::Regional));
        assert!(!rail.contains(TransportProduct::Bus));
    }

    #[test]
    fn query_flags_cover_every_product() {
        let set = ProductSet::new().with(TransportProduct::Subway);
        let flags = set.query_flags();

        assert_eq!(flags.len(), TransportProduct::ALL.len());
        assert!(flags.contains(&("subway", true)));
        assert!(flags.contains(&("bus", false)));
        assert!(flags.contains(&("nationalExpress", false)));
    }
}
