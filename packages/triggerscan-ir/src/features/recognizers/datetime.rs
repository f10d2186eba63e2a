//! Date/time domain rules
//!
//! Wall-clock accessors attach `#now`; component reads off a `#now`-tagged
//! value attach the matching sub-tag; temporal comparisons against a tagged
//! receiver are sinks.

use super::chain::RecognizerChain;
use super::rules::{ComparisonSinkRule, ComponentRule, SourceRule};
use crate::shared::models::tag::TAG_NOW;

const DATE: &str = "java.util.Date";
const CALENDAR: &str = "java.util.Calendar";
const SYSTEM: &str = "java.lang.System";
const SYSTEM_CLOCK: &str = "android.os.SystemClock";

/// Temporal comparison methods treated as sinks
const TEMPORAL_COMPARISONS: &[&str] = &["before", "after", "equals", "compareTo"];

pub fn chain() -> RecognizerChain {
    RecognizerChain::new(
        "datetime",
        vec![
            Box::new(SourceRule::new("date-init", DATE, "<init>", TAG_NOW)),
            Box::new(SourceRule::new(
                "calendar-instance",
                CALENDAR,
                "getInstance",
                TAG_NOW,
            )),
            Box::new(SourceRule::new(
                "current-millis",
                SYSTEM,
                "currentTimeMillis",
                TAG_NOW,
            )),
            Box::new(SourceRule::new(
                "uptime-millis",
                SYSTEM_CLOCK,
                "uptimeMillis",
                TAG_NOW,
            )),
            Box::new(ComponentRule::new(
                "date-seconds",
                DATE,
                "getSeconds",
                TAG_NOW,
                "#seconds",
            )),
            Box::new(ComponentRule::new(
                "date-minutes",
                DATE,
                "getMinutes",
                TAG_NOW,
                "#minutes",
            )),
            Box::new(ComponentRule::new(
                "date-hours",
                DATE,
                "getHours",
                TAG_NOW,
                "#hours",
            )),
            Box::new(ComponentRule::new(
                "date-day",
                DATE,
                "getDate",
                TAG_NOW,
                "#day",
            )),
            Box::new(ComponentRule::new(
                "date-month",
                DATE,
                "getMonth",
                TAG_NOW,
                "#month",
            )),
            Box::new(ComponentRule::new(
                "date-millis",
                DATE,
                "getTime",
                TAG_NOW,
                "#millis",
            )),
            Box::new(ComponentRule::new(
                "calendar-field",
                CALENDAR,
                "get",
                TAG_NOW,
                "#field",
            )),
            Box::new(ComparisonSinkRule::new(
                "date-comparison",
                Some(DATE),
                TEMPORAL_COMPARISONS,
                &[TAG_NOW],
            )),
            Box::new(ComparisonSinkRule::new(
                "calendar-comparison",
                Some(CALENDAR),
                TEMPORAL_COMPARISONS,
                &[TAG_NOW],
            )),
        ],
    )
}
