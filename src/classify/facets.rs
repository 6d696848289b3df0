// src/classify/facets.rs
//! Boat-type and event-type facets.

use super::Classifier;
use crate::event::{BoatType, EventType};
use crate::extract::dates::is_multi_day;

impl Classifier {
    /// Yacht terms are checked before dinghy terms; nothing matched is `Mixed`.
    pub fn boat_type(&self, text: &str) -> BoatType {
        if self.yacht.as_ref().is_some_and(|re| re.is_match(text)) {
            BoatType::Yacht
        } else if self.dinghy.as_ref().is_some_and(|re| re.is_match(text)) {
            BoatType::Dinghy
        } else {
            BoatType::Mixed
        }
    }

    /// Series vocabulary wins over the date-span shape.
    pub fn event_type(&self, title: &str, dates: &[String], details: &str) -> EventType {
        let combined = format!("{title} {details} {}", dates.join(" "));
        if self.series.as_ref().is_some_and(|re| re.is_match(&combined)) {
            EventType::Series
        } else if is_multi_day(dates) {
            EventType::MultiDay
        } else {
            EventType::SingleDay
        }
    }
}
