#[cfg(test)]
mod tests;

use std::time::Duration;

use tracing::{debug, warn};

/// Public geographic-boundary endpoint used by the topology page
pub const BOUNDARY_URL: &str = "https://geo.datav.aliyun.com/areas_v3/bound/100000_full.json";

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of the boundary fetch. Failure is an expected state the
/// topology page renders as a notice, never an error that propagates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryData {
    Available { regions: usize },
    Unavailable { reason: String },
}

/// Fetch the map boundary data with a bounded timeout, degrading to
/// [`BoundaryData::Unavailable`] on any failure.
#[inline]
pub fn load_boundary() -> BoundaryData {
    fetch_boundary(BOUNDARY_URL)
}

#[inline]
pub fn fetch_boundary(url: &str) -> BoundaryData {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(FETCH_TIMEOUT))
        .build()
        .into();

    let body = match agent
        .get(url)
        .call()
        .and_then(|mut resp| resp.body_mut().read_to_string())
    {
        Ok(body) => body,
        Err(e) => {
            warn!("Boundary data fetch failed: {e}");
            return BoundaryData::Unavailable {
                reason: e.to_string(),
            };
        }
    };

    match summarize_boundary(&body) {
        Some(regions) => {
            debug!("Boundary data loaded with {regions} regions");
            BoundaryData::Available { regions }
        }
        None => {
            warn!("Boundary data response was not valid GeoJSON");
            BoundaryData::Unavailable {
                reason: "malformed boundary document".to_string(),
            }
        }
    }
}

/// Count the feature regions of a GeoJSON boundary document
fn summarize_boundary(body: &str) -> Option<usize> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("features")
        .and_then(|features| features.as_array())
        .map(|features| features.len())
}
