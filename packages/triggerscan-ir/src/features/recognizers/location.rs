//! Location domain rules
//!
//! Last-known-position accessors attach `#here`; coordinate reads attach the
//! matching sub-tag; `distanceBetween` is the multi-argument sink joining
//! taint across sibling coordinate arguments.

use super::chain::RecognizerChain;
use super::rules::{ComparisonSinkRule, ComponentRule, CrossArgumentSinkRule, SourceRule};
use crate::shared::models::tag::TAG_HERE;

const LOCATION: &str = "android.location.Location";
const LOCATION_MANAGER: &str = "android.location.LocationManager";

pub fn chain() -> RecognizerChain {
    RecognizerChain::new(
        "location",
        vec![
            Box::new(SourceRule::new(
                "last-known-location",
                LOCATION_MANAGER,
                "getLastKnownLocation",
                TAG_HERE,
            )),
            Box::new(ComponentRule::new(
                "latitude",
                LOCATION,
                "getLatitude",
                TAG_HERE,
                "#latitude",
            )),
            Box::new(ComponentRule::new(
                "longitude",
                LOCATION,
                "getLongitude",
                TAG_HERE,
                "#longitude",
            )),
            Box::new(ComponentRule::new(
                "altitude",
                LOCATION,
                "getAltitude",
                TAG_HERE,
                "#altitude",
            )),
            Box::new(CrossArgumentSinkRule::new(
                "distance-between",
                LOCATION,
                "distanceBetween",
                TAG_HERE,
            )),
            Box::new(ComparisonSinkRule::new(
                "distance-to",
                Some(LOCATION),
                &["distanceTo", "equals"],
                &[TAG_HERE],
            )),
        ],
    )
}
