//! Scoring the daylight segments of a day for an undertaking.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::time::at_hours;
use crate::models::{PanchangIndices, PlanetaryInfluence, Purpose, TimingWindow, WindowQuality};
use crate::rules::{favoured_bodies, rahu_kaal_segment, weekday_lord, RuleTables};

pub const SEGMENTS_PER_DAY: usize = 8;
const BASE_SCORE: f64 = 0.5;
const INDEX_BONUS: f64 = 0.1;
const LORD_BONUS: f64 = 0.1;
const ABHIJIT_BONUS: f64 = 0.1;
const FAVOURED_INFLUENCE: f64 = 0.1;
const OTHER_INFLUENCE: f64 = 0.05;
const RAHU_KAAL_CAP: f64 = 0.2;

/// The UTC daylight span that gets cut into segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Daylight {
    pub sunrise_hour: f64,
    pub daylight_hours: f64,
}

impl Default for Daylight {
    fn default() -> Self {
        Self {
            sunrise_hour: 6.0,
            daylight_hours: 12.0,
        }
    }
}

impl Daylight {
    pub fn segment_hours(&self) -> f64 {
        self.daylight_hours / SEGMENTS_PER_DAY as f64
    }
}

/// 1-based segment that starts at the middle of the day.
pub const ABHIJIT_SEGMENT: usize = SEGMENTS_PER_DAY / 2 + 1;

pub struct MuhurtaCalculator<'a> {
    rules: &'a RuleTables,
    daylight: Daylight,
}

impl<'a> MuhurtaCalculator<'a> {
    pub fn new(rules: &'a RuleTables, daylight: Daylight) -> Self {
        Self { rules, daylight }
    }

    /// Score every daylight segment of `date`, in chronological order.
    pub fn windows_for(
        &self,
        date: NaiveDate,
        purpose: Purpose,
        panchang: &PanchangIndices,
        influences: &[PlanetaryInfluence],
    ) -> Vec<TimingWindow> {
        let weekday = date.weekday();
        let (day_score, day_reasons) = self.day_score(weekday, purpose, panchang, influences);
        let step = self.daylight.segment_hours();

        (1..=SEGMENTS_PER_DAY)
            .map(|segment| {
                let offset = self.daylight.sunrise_hour + step * (segment - 1) as f64;
                let mut score = day_score;
                let mut reasons = day_reasons.clone();

                if segment == ABHIJIT_SEGMENT && weekday != Weekday::Wed {
                    score += ABHIJIT_BONUS;
                    reasons.push("Abhijit muhurta".to_string());
                }

                let score = score.clamp(0.0, 1.0);
                let (quality, score) = if segment == rahu_kaal_segment(weekday) {
                    reasons.push("Rahu Kaal".to_string());
                    (WindowQuality::Avoid, score.min(RAHU_KAAL_CAP))
                } else {
                    (WindowQuality::from_score(score), score)
                };

                TimingWindow {
                    start: at_hours(date, offset),
                    end: at_hours(date, offset + step),
                    quality,
                    score,
                    reasons,
                }
            })
            .collect()
    }

    /// The part of the score shared by every segment of the day.
    fn day_score(
        &self,
        weekday: Weekday,
        purpose: Purpose,
        panchang: &PanchangIndices,
        influences: &[PlanetaryInfluence],
    ) -> (f64, Vec<String>) {
        let mut score = BASE_SCORE;
        let mut reasons = Vec::new();

        if self.rules.is_auspicious_tithi(panchang) {
            score += INDEX_BONUS;
            reasons.push(format!("Auspicious tithi {}", panchang.tithi));
        }
        if self.rules.is_auspicious_nakshatra(panchang) {
            score += INDEX_BONUS;
            reasons.push(format!("Auspicious nakshatra {}", panchang.nakshatra));
        }
        if self.rules.is_auspicious_yoga(panchang) {
            score += INDEX_BONUS;
            reasons.push(format!("Auspicious yoga {}", panchang.yoga));
        }

        let favoured = favoured_bodies(purpose);
        let lord = weekday_lord(weekday);
        if favoured.contains(&lord) {
            score += LORD_BONUS;
            reasons.push(format!("Day ruled by {}, favourable for {}", lord, purpose));
        }

        for influence in influences {
            let weight = if favoured.contains(&influence.body) {
                FAVOURED_INFLUENCE
            } else {
                OTHER_INFLUENCE
            };
            let delta = weight * influence.strength;
            if delta != 0.0 {
                score += delta;
                let direction = if delta > 0.0 { "Supportive" } else { "Weakening" };
                reasons.push(format!("{} influence of {}", direction, influence.body));
            }
        }

        (score, reasons)
    }
}
