//! Wire types for the coordinator's service GC safepoint API.

use serde::{Deserialize, Deserializer, Serialize};

/// Resource path of the service GC safepoint API, relative to the coordinator endpoint.
pub const SERVICE_GC_SAFEPOINT_PREFIX: &str = "pd/api/v1/gc/safepoint";

/// A GC safepoint registered by one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSafepoint {
    /// Identifier of the registering service.
    pub service_id: String,
    /// Unix timestamp (seconds) after which the registration is stale.
    pub expired_at: i64,
    /// Version below which data must be retained for this service.
    pub safe_point: u64,
}

/// Response of `GET pd/api/v1/gc/safepoint`.
///
/// Field order is the wire order and is preserved when re-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSafepointListing {
    /// Registered service safepoints, in server order until sorted.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub service_gc_safepoints: Vec<ServiceSafepoint>,
    /// Cluster-wide GC safepoint.
    pub gc_safe_point: u64,
}

impl ServiceSafepointListing {
    /// Sorts entries by `safe_point` ascending, keeping server order for ties.
    pub fn sort_by_safe_point(&mut self) {
        self.service_gc_safepoints.sort_by_key(|sp| sp.safe_point);
    }
}

/// Returns the path addressing a single service's registration.
///
/// The identifier is appended verbatim; no escaping is applied.
#[must_use]
pub fn service_safepoint_path(service_id: &str) -> String {
    format!("{SERVICE_GC_SAFEPOINT_PREFIX}/{service_id}")
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ServiceSafepoint>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ServiceSafepoint>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(id: &str, safe_point: u64) -> ServiceSafepoint {
        ServiceSafepoint {
            service_id: id.to_string(),
            expired_at: 1_700_000_000,
            safe_point,
        }
    }

    #[test]
    fn sort_orders_by_safe_point_and_keeps_ties() {
        let mut listing = ServiceSafepointListing {
            service_gc_safepoints: vec![entry("b", 50), entry("a", 10), entry("c", 10)],
            gc_safe_point: 10,
        };
        listing.sort_by_safe_point();

        let ids: Vec<_> = listing
            .service_gc_safepoints
            .iter()
            .map(|sp| sp.service_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn null_entries_decode_as_empty() {
        let listing: ServiceSafepointListing =
            serde_json::from_str(r#"{"service_gc_safepoints":null,"gc_safe_point":7}"#)
                .expect("decode");
        assert!(listing.service_gc_safepoints.is_empty());
        assert_eq!(listing.gc_safe_point, 7);
    }

    #[test]
    fn missing_global_safe_point_is_rejected() {
        let result: Result<ServiceSafepointListing, _> =
            serde_json::from_str(r#"{"service_gc_safepoints":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn delete_path_appends_identifier_verbatim() {
        assert_eq!(
            service_safepoint_path("br-backup"),
            "pd/api/v1/gc/safepoint/br-backup"
        );
        assert_eq!(
            service_safepoint_path("../members"),
            "pd/api/v1/gc/safepoint/../members"
        );
    }

    proptest! {
        #[test]
        fn sort_is_stable_and_non_decreasing(
            points in proptest::collection::vec(0u64..8, 0..32)
        ) {
            let entries: Vec<_> = points
                .iter()
                .enumerate()
                .map(|(i, sp)| entry(&i.to_string(), *sp))
                .collect();
            let mut listing = ServiceSafepointListing {
                service_gc_safepoints: entries,
                gc_safe_point: 0,
            };
            listing.sort_by_safe_point();

            for pair in listing.service_gc_safepoints.windows(2) {
                prop_assert!(pair[0].safe_point <= pair[1].safe_point);
                if pair[0].safe_point == pair[1].safe_point {
                    let left: usize = pair[0].service_id.parse().unwrap();
                    let right: usize = pair[1].service_id.parse().unwrap();
                    prop_assert!(left < right);
                }
            }
            prop_assert_eq!(listing.service_gc_safepoints.len(), points.len());
        }
    }
}
