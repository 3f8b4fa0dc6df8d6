//! Weather suitability scoring.
//!
//! Every event type owns a static rule set: an ordered list of factor rules,
//! each mapping one observed value into a status bucket worth a number of
//! points. The score is the sum over the rule set; percentage and rating are
//! always derived from it.
//!
//! Rule table (bounds inclusive, every rule set totals 100 points):
//!
//! | type      | factor        | ideal        | acceptable  | points  |
//! |-----------|---------------|--------------|-------------|---------|
//! | sports    | temperature   | 18–28 °C     | 12–32 °C    | 30 / 15 |
//! | sports    | precipitation | ≤ 0.5 mm     | ≤ 2.5 mm    | 30 / 15 |
//! | sports    | wind          | ≤ 4.0 m/s    | ≤ 7.0 m/s   | 25 / 12 |
//! | sports    | conditions    | keyword      |             | 15      |
//! | formal    | precipitation | ≤ 0.0 mm     | ≤ 1.0 mm    | 40 / 20 |
//! | formal    | temperature   | 20–26 °C     | 18–29 °C    | 30 / 15 |
//! | formal    | humidity      | 40–60 %      | 30–70 %     | 20 / 10 |
//! | formal    | wind          | ≤ 3.0 m/s    | ≤ 4.5 m/s   | 10 / 5  |
//! | adventure | temperature   | 10–25 °C     | 5–30 °C     | 30 / 15 |
//! | adventure | precipitation | ≤ 1.5 mm     | ≤ 4.0 mm    | 25 / 12 |
//! | adventure | visibility    | keyword      |             | 25      |
//! | adventure | wind          | 1.5–5.5 m/s  | 0.5–8.5 m/s | 20 / 10 |
//! | picnic    | temperature   | 18–27 °C     | 15–30 °C    | 40 / 25 |
//! | picnic    | precipitation | ≤ 0.0 mm     | ≤ 1.0 mm    | 30 / 15 |
//! | picnic    | humidity      | 30–60 %      | 20–75 %     | 20 / 10 |
//! | picnic    | wind          | 1.0–4.5 m/s  | 0.5–5.5 m/s | 10 / 5  |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::services::weather::WeatherObservation;

/// Lowest and highest air temperatures accepted as physically plausible (°C).
const MIN_TEMPERATURE_C: f64 = -100.0;
const MAX_TEMPERATURE_C: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("{field} = {value} is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Kind of event being planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Sports,
    Formal,
    Adventure,
    Picnic,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown event type '{0}' (expected one of: sports, formal, adventure, picnic)")]
pub struct UnknownEventType(pub String);

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::Sports,
        EventType::Formal,
        EventType::Adventure,
        EventType::Picnic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Sports => "sports",
            EventType::Formal => "formal",
            EventType::Adventure => "adventure",
            EventType::Picnic => "picnic",
        }
    }

    pub fn rules(self) -> &'static [FactorRule] {
        match self {
            EventType::Sports => SPORTS_RULES,
            EventType::Formal => FORMAL_RULES,
            EventType::Adventure => ADVENTURE_RULES,
            EventType::Picnic => PICNIC_RULES,
        }
    }

    /// Sum of factor maxima for this type's rule set.
    pub fn max_score(self) -> u32 {
        self.rules().iter().map(|r| r.max_points).sum()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

/// Aspect of the weather a rule evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    Temperature,
    Precipitation,
    Wind,
    Humidity,
    /// Sky conditions, read from the description.
    Conditions,
    /// Visibility, estimated from the description.
    Visibility,
}

impl Factor {
    pub fn as_str(self) -> &'static str {
        match self {
            Factor::Temperature => "temperature",
            Factor::Precipitation => "precipitation",
            Factor::Wind => "wind",
            Factor::Humidity => "humidity",
            Factor::Conditions => "conditions",
            Factor::Visibility => "visibility",
        }
    }
}

/// How an observed value is bucketed.
#[derive(Debug, Clone, Copy)]
pub enum Evaluator {
    /// Value should sit inside a range; too low or too high both lose points.
    Band {
        ideal: (f64, f64),
        acceptable: (f64, f64),
        below: &'static str,
        above: &'static str,
    },
    /// Less is better.
    Ceiling {
        ideal_max: f64,
        acceptable_max: f64,
        over: &'static str,
    },
    /// First keyword found in the description wins: (keyword, points, status).
    Keyword {
        table: &'static [(&'static str, u32, &'static str)],
        fallback: (u32, &'static str),
    },
}

#[derive(Debug, Clone, Copy)]
pub struct FactorRule {
    pub factor: Factor,
    pub evaluator: Evaluator,
    pub max_points: u32,
    /// Points for the "acceptable" bucket of Band/Ceiling rules.
    pub acceptable_points: u32,
}

const TOO_COLD: &str = "too cold";
const TOO_HOT: &str = "too hot";
const TOO_WET: &str = "too wet";
const TOO_WINDY: &str = "too windy";
const TOO_CALM: &str = "too calm";
const TOO_DRY: &str = "too dry";
const TOO_HUMID: &str = "too humid";

const SKY_CONDITIONS: &[(&str, u32, &str)] = &[
    ("thunderstorm", 0, "stormy"),
    ("heavy", 0, "heavy precipitation"),
    ("snow", 0, "snowy"),
    ("drizzle", 5, "wet"),
    ("rain", 5, "wet"),
    ("overcast", 10, "overcast"),
    ("clear", 15, "clear"),
    ("clouds", 12, "cloudy"),
];

const VISIBILITY: &[(&str, u32, &str)] = &[
    ("fog", 0, "poor"),
    ("mist", 0, "poor"),
    ("haze", 12, "reduced"),
    ("smoke", 12, "reduced"),
    ("dust", 12, "reduced"),
    ("sand", 12, "reduced"),
    ("rain", 15, "moderate"),
    ("drizzle", 15, "moderate"),
    ("snow", 15, "moderate"),
];

static SPORTS_RULES: &[FactorRule] = &[
    FactorRule {
        factor: Factor::Temperature,
        evaluator: Evaluator::Band {
            ideal: (18.0, 28.0),
            acceptable: (12.0, 32.0),
            below: TOO_COLD,
            above: TOO_HOT,
        },
        max_points: 30,
        acceptable_points: 15,
    },
    FactorRule {
        factor: Factor::Precipitation,
        evaluator: Evaluator::Ceiling {
            ideal_max: 0.5,
            acceptable_max: 2.5,
            over: TOO_WET,
        },
        max_points: 30,
        acceptable_points: 15,
    },
    FactorRule {
        factor: Factor::Wind,
        evaluator: Evaluator::Ceiling {
            ideal_max: 4.0,
            acceptable_max: 7.0,
            over: TOO_WINDY,
        },
        max_points: 25,
        acceptable_points: 12,
    },
    FactorRule {
        factor: Factor::Conditions,
        evaluator: Evaluator::Keyword {
            table: SKY_CONDITIONS,
            fallback: (5, "mixed"),
        },
        max_points: 15,
        acceptable_points: 0,
    },
];

static FORMAL_RULES: &[FactorRule] = &[
    FactorRule {
        factor: Factor::Precipitation,
        evaluator: Evaluator::Ceiling {
            ideal_max: 0.0,
            acceptable_max: 1.0,
            over: TOO_WET,
        },
        max_points: 40,
        acceptable_points: 20,
    },
    FactorRule {
        factor: Factor::Temperature,
        evaluator: Evaluator::Band {
            ideal: (20.0, 26.0),
            acceptable: (18.0, 29.0),
            below: TOO_COLD,
            above: TOO_HOT,
        },
        max_points: 30,
        acceptable_points: 15,
    },
    FactorRule {
        factor: Factor::Humidity,
        evaluator: Evaluator::Band {
            ideal: (40.0, 60.0),
            acceptable: (30.0, 70.0),
            below: TOO_DRY,
            above: TOO_HUMID,
        },
        max_points: 20,
        acceptable_points: 10,
    },
    FactorRule {
        factor: Factor::Wind,
        evaluator: Evaluator::Ceiling {
            ideal_max: 3.0,
            acceptable_max: 4.5,
            over: TOO_WINDY,
        },
        max_points: 10,
        acceptable_points: 5,
    },
];

static ADVENTURE_RULES: &[FactorRule] = &[
    FactorRule {
        factor: Factor::Temperature,
        evaluator: Evaluator::Band {
            ideal: (10.0, 25.0),
            acceptable: (5.0, 30.0),
            below: TOO_COLD,
            above: TOO_HOT,
        },
        max_points: 30,
        acceptable_points: 15,
    },
    FactorRule {
        factor: Factor::Precipitation,
        evaluator: Evaluator::Ceiling {
            ideal_max: 1.5,
            acceptable_max: 4.0,
            over: TOO_WET,
        },
        max_points: 25,
        acceptable_points: 12,
    },
    FactorRule {
        factor: Factor::Visibility,
        evaluator: Evaluator::Keyword {
            table: VISIBILITY,
            fallback: (25, "good"),
        },
        max_points: 25,
        acceptable_points: 0,
    },
    FactorRule {
        factor: Factor::Wind,
        evaluator: Evaluator::Band {
            ideal: (1.5, 5.5),
            acceptable: (0.5, 8.5),
            below: TOO_CALM,
            above: TOO_WINDY,
        },
        max_points: 20,
        acceptable_points: 10,
    },
];

static PICNIC_RULES: &[FactorRule] = &[
    FactorRule {
        factor: Factor::Temperature,
        evaluator: Evaluator::Band {
            ideal: (18.0, 27.0),
            acceptable: (15.0, 30.0),
            below: TOO_COLD,
            above: TOO_HOT,
        },
        max_points: 40,
        acceptable_points: 25,
    },
    FactorRule {
        factor: Factor::Precipitation,
        evaluator: Evaluator::Ceiling {
            ideal_max: 0.0,
            acceptable_max: 1.0,
            over: TOO_WET,
        },
        max_points: 30,
        acceptable_points: 15,
    },
    FactorRule {
        factor: Factor::Humidity,
        evaluator: Evaluator::Band {
            ideal: (30.0, 60.0),
            acceptable: (20.0, 75.0),
            below: TOO_DRY,
            above: TOO_HUMID,
        },
        max_points: 20,
        acceptable_points: 10,
    },
    FactorRule {
        factor: Factor::Wind,
        evaluator: Evaluator::Band {
            ideal: (1.0, 4.5),
            acceptable: (0.5, 5.5),
            below: TOO_CALM,
            above: TOO_WINDY,
        },
        max_points: 10,
        acceptable_points: 5,
    },
];

/// Four-level rating derived from the percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
pub enum Rating {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Rating {
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= 85 {
            Rating::Excellent
        } else if percentage >= 65 {
            Rating::Good
        } else if percentage >= 40 {
            Rating::Fair
        } else {
            Rating::Poor
        }
    }
}

/// Observed input for a factor: a measurement or the description text.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum FactorValue {
    Number(f64),
    Text(String),
}

/// Per-factor breakdown entry.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FactorDetail {
    pub value: FactorValue,
    pub points: u32,
    /// "ideal", "acceptable", or the rule's out-of-range label (e.g. "too wet")
    pub status: String,
}

/// Suitability of a weather observation for an event type.
///
/// Only constructed from a score, so `percentage` and `rating` cannot drift
/// from it.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SuitabilityResult {
    score: u32,
    max_score: u32,
    /// round(100 × score / max_score)
    percentage: u32,
    rating: Rating,
    /// Factor name → breakdown
    details: BTreeMap<String, FactorDetail>,
}

impl SuitabilityResult {
    fn from_details(max_score: u32, details: BTreeMap<String, FactorDetail>) -> Self {
        let score: u32 = details.values().map(|d| d.points).sum();
        let percentage = if max_score == 0 {
            0
        } else {
            (100.0 * f64::from(score) / f64::from(max_score)).round() as u32
        };
        Self {
            score,
            max_score,
            percentage,
            rating: Rating::from_percentage(percentage),
            details,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn details(&self) -> &BTreeMap<String, FactorDetail> {
        &self.details
    }
}

/// Score `weather` against the rule set of `event_type`.
pub fn score(
    event_type: EventType,
    weather: &WeatherObservation,
) -> Result<SuitabilityResult, ScoreError> {
    validate(weather)?;

    let details = event_type
        .rules()
        .iter()
        .map(|rule| (rule.factor.as_str().to_string(), evaluate(rule, weather)))
        .collect();

    Ok(SuitabilityResult::from_details(event_type.max_score(), details))
}

fn validate(weather: &WeatherObservation) -> Result<(), ScoreError> {
    let checks: [(&'static str, f64); 4] = [
        ("temperature", weather.temperature),
        ("humidity", weather.humidity),
        ("wind_speed", weather.wind_speed),
        ("precipitation", weather.precipitation),
    ];
    for (field, value) in checks {
        if !value.is_finite() {
            return Err(ScoreError::OutOfRange {
                field,
                value,
                reason: "must be a finite number",
            });
        }
    }

    let out_of_range =
        |field, value, reason| Err(ScoreError::OutOfRange { field, value, reason });
    if !(MIN_TEMPERATURE_C..=MAX_TEMPERATURE_C).contains(&weather.temperature) {
        return out_of_range(
            "temperature",
            weather.temperature,
            "must be within -100..=70 °C",
        );
    }
    if !(0.0..=100.0).contains(&weather.humidity) {
        return out_of_range("humidity", weather.humidity, "must be within 0..=100 %");
    }
    if weather.wind_speed < 0.0 {
        return out_of_range("wind_speed", weather.wind_speed, "must not be negative");
    }
    if weather.precipitation < 0.0 {
        return out_of_range("precipitation", weather.precipitation, "must not be negative");
    }
    Ok(())
}

fn evaluate(rule: &FactorRule, weather: &WeatherObservation) -> FactorDetail {
    let measured = match rule.factor {
        Factor::Temperature => Some(weather.temperature),
        Factor::Precipitation => Some(weather.precipitation),
        Factor::Wind => Some(weather.wind_speed),
        Factor::Humidity => Some(weather.humidity),
        Factor::Conditions | Factor::Visibility => None,
    };

    let (points, status) = match (rule.evaluator, measured) {
        (
            Evaluator::Band {
                ideal,
                acceptable,
                below,
                above,
            },
            Some(v),
        ) => {
            if ideal.0 <= v && v <= ideal.1 {
                (rule.max_points, "ideal")
            } else if acceptable.0 <= v && v <= acceptable.1 {
                (rule.acceptable_points, "acceptable")
            } else if v < ideal.0 {
                (0, below)
            } else {
                (0, above)
            }
        }
        (
            Evaluator::Ceiling {
                ideal_max,
                acceptable_max,
                over,
            },
            Some(v),
        ) => {
            if v <= ideal_max {
                (rule.max_points, "ideal")
            } else if v <= acceptable_max {
                (rule.acceptable_points, "acceptable")
            } else {
                (0, over)
            }
        }
        (Evaluator::Keyword { table, fallback }, _) => {
            let description = weather.description.to_lowercase();
            table
                .iter()
                .find(|(keyword, _, _)| description.contains(keyword))
                .map(|&(_, points, status)| (points, status))
                .unwrap_or(fallback)
        }
        // Numeric evaluators on text factors never appear in the rule tables.
        (_, None) => (0, "unscored"),
    };

    let value = match measured {
        Some(v) => FactorValue::Number(v),
        None => FactorValue::Text(weather.description.clone()),
    };

    FactorDetail {
        value,
        points: points.min(rule.max_points),
        status: status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(
        temperature: f64,
        wind_speed: f64,
        precipitation: f64,
        humidity: f64,
    ) -> WeatherObservation {
        WeatherObservation {
            temperature,
            humidity,
            wind_speed,
            precipitation,
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
        }
    }

    fn with_description(mut w: WeatherObservation, description: &str) -> WeatherObservation {
        w.description = description.to_string();
        w
    }

    #[test]
    fn test_every_rule_set_totals_100() {
        for t in EventType::ALL {
            assert_eq!(t.max_score(), 100, "{} rule set", t);
        }
    }

    #[test]
    fn test_keyword_tables_never_exceed_factor_max() {
        for t in EventType::ALL {
            for rule in t.rules() {
                if let Evaluator::Keyword { table, fallback } = rule.evaluator {
                    assert!(fallback.0 <= rule.max_points);
                    assert!(table.iter().all(|(_, p, _)| *p <= rule.max_points));
                }
                assert!(rule.acceptable_points <= rule.max_points);
            }
        }
    }

    #[test]
    fn test_picnic_perfect_day_is_excellent() {
        let result = score(EventType::Picnic, &weather(22.0, 3.0, 0.0, 50.0)).unwrap();
        assert_eq!(result.score(), 100);
        assert_eq!(result.percentage(), 100);
        assert_eq!(result.rating(), Rating::Excellent);
        assert!(result.details().values().all(|d| d.status == "ideal"));
    }

    #[test]
    fn test_formal_heavy_rain_is_too_wet() {
        let result = score(EventType::Formal, &weather(22.0, 2.0, 15.0, 50.0)).unwrap();
        let precip = &result.details()["precipitation"];
        assert_eq!(precip.status, "too wet");
        assert_eq!(precip.points, 0);
        assert_eq!(precip.value, FactorValue::Number(15.0));
        assert_eq!(result.score(), 60);
        assert_eq!(result.rating(), Rating::Fair);
    }

    #[test]
    fn test_band_statuses() {
        let cold = score(EventType::Sports, &weather(5.0, 1.0, 0.0, 50.0)).unwrap();
        assert_eq!(cold.details()["temperature"].status, "too cold");

        let hot = score(EventType::Sports, &weather(35.0, 1.0, 0.0, 50.0)).unwrap();
        assert_eq!(hot.details()["temperature"].status, "too hot");

        let mild = score(EventType::Sports, &weather(14.0, 1.0, 0.0, 50.0)).unwrap();
        assert_eq!(mild.details()["temperature"].status, "acceptable");
        assert_eq!(mild.details()["temperature"].points, 15);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let result = score(EventType::Formal, &weather(26.0, 3.0, 0.0, 60.0)).unwrap();
        assert_eq!(result.score(), 100);

        let edge = score(EventType::Formal, &weather(29.0, 4.5, 1.0, 70.0)).unwrap();
        assert!(edge.details().values().all(|d| d.status == "acceptable"));
        assert_eq!(edge.score(), 50);
    }

    #[test]
    fn test_adventure_wind_too_calm_and_too_windy() {
        let light = score(EventType::Adventure, &weather(15.0, 0.5, 0.0, 50.0)).unwrap();
        assert_eq!(light.details()["wind"].status, "acceptable");

        let calm = score(EventType::Adventure, &weather(15.0, 0.0, 0.0, 50.0)).unwrap();
        assert_eq!(calm.details()["wind"].status, "too calm");
        assert_eq!(calm.details()["wind"].points, 0);

        let gale = score(EventType::Adventure, &weather(15.0, 12.0, 0.0, 50.0)).unwrap();
        assert_eq!(gale.details()["wind"].status, "too windy");
        assert_eq!(gale.details()["wind"].points, 0);
    }

    #[test]
    fn test_picnic_still_air_is_too_calm() {
        let still = score(EventType::Picnic, &weather(22.0, 0.2, 0.0, 50.0)).unwrap();
        assert_eq!(still.details()["wind"].status, "too calm");
        assert_eq!(still.score(), 90);
        assert_eq!(still.rating(), Rating::Excellent);
    }

    #[test]
    fn test_picnic_scores_measured_factors_only() {
        let result = score(EventType::Picnic, &weather(22.0, 3.0, 0.0, 50.0)).unwrap();
        let factors: Vec<&str> = result.details().keys().map(String::as_str).collect();
        assert_eq!(factors, vec!["humidity", "precipitation", "temperature", "wind"]);
        assert!(result
            .details()
            .values()
            .all(|d| matches!(d.value, FactorValue::Number(_))));
    }

    #[test]
    fn test_adventure_fog_hurts_visibility() {
        let foggy = with_description(weather(15.0, 3.0, 0.0, 90.0), "Fog");
        let result = score(EventType::Adventure, &foggy).unwrap();
        let vis = &result.details()["visibility"];
        assert_eq!(vis.status, "poor");
        assert_eq!(vis.points, 0);
        assert_eq!(vis.value, FactorValue::Text("Fog".to_string()));
        assert_eq!(result.score(), 75);
        assert_eq!(result.rating(), Rating::Good);
    }

    #[test]
    fn test_sports_conditions_first_keyword_wins() {
        let overcast = with_description(weather(20.0, 2.0, 0.0, 50.0), "overcast clouds");
        let result = score(EventType::Sports, &overcast).unwrap();
        assert_eq!(result.details()["conditions"].points, 10);

        let storm = with_description(weather(20.0, 2.0, 0.0, 50.0), "thunderstorm with light rain");
        let result = score(EventType::Sports, &storm).unwrap();
        assert_eq!(result.details()["conditions"].status, "stormy");

        let unknown = with_description(weather(20.0, 2.0, 0.0, 50.0), "");
        let result = score(EventType::Sports, &unknown).unwrap();
        assert_eq!(result.details()["conditions"].status, "mixed");
    }

    #[test]
    fn test_score_bounds_and_percentage_invariant() {
        let temps = [-30.0, 0.0, 9.9, 15.0, 22.0, 28.5, 31.0, 45.0];
        let winds = [0.0, 1.2, 3.0, 5.0, 8.0, 20.0];
        let precips = [0.0, 0.4, 1.0, 3.0, 15.0];
        let humidities = [0.0, 25.0, 50.0, 72.0, 100.0];

        for t in EventType::ALL {
            for &temp in &temps {
                for &wind in &winds {
                    for &precip in &precips {
                        for &hum in &humidities {
                            let r = score(t, &weather(temp, wind, precip, hum)).unwrap();
                            assert!(r.score() <= r.max_score());
                            let expected =
                                (100.0 * r.score() as f64 / r.max_score() as f64).round() as u32;
                            assert_eq!(r.percentage(), expected);
                            assert_eq!(r.rating(), Rating::from_percentage(r.percentage()));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(Rating::from_percentage(100), Rating::Excellent);
        assert_eq!(Rating::from_percentage(85), Rating::Excellent);
        assert_eq!(Rating::from_percentage(84), Rating::Good);
        assert_eq!(Rating::from_percentage(65), Rating::Good);
        assert_eq!(Rating::from_percentage(64), Rating::Fair);
        assert_eq!(Rating::from_percentage(40), Rating::Fair);
        assert_eq!(Rating::from_percentage(39), Rating::Poor);
        assert_eq!(Rating::from_percentage(0), Rating::Poor);
    }

    #[test]
    fn test_rating_is_monotonic() {
        for p in 1..=100 {
            assert!(Rating::from_percentage(p) >= Rating::from_percentage(p - 1));
        }
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let w = with_description(weather(19.3, 4.1, 0.7, 66.0), "light rain");
        for t in EventType::ALL {
            assert_eq!(score(t, &w).unwrap(), score(t, &w).unwrap());
        }
    }

    #[test]
    fn test_rejects_out_of_range_inputs() {
        let cases = [
            weather(20.0, 3.0, 0.0, 101.0),
            weather(20.0, 3.0, 0.0, -1.0),
            weather(20.0, -0.1, 0.0, 50.0),
            weather(20.0, 3.0, -2.0, 50.0),
            weather(f64::NAN, 3.0, 0.0, 50.0),
            weather(120.0, 3.0, 0.0, 50.0),
        ];
        for w in &cases {
            let err = score(EventType::Picnic, w).unwrap_err();
            assert!(matches!(err, ScoreError::OutOfRange { .. }), "{:?}", w);
        }
    }

    #[test]
    fn test_rating_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&Rating::Excellent).unwrap(), "\"Excellent\"");
    }

    #[test]
    fn test_event_type_parsing() {
        assert_eq!("Picnic".parse::<EventType>().unwrap(), EventType::Picnic);
        assert_eq!(" formal ".parse::<EventType>().unwrap(), EventType::Formal);
        assert!("wedding".parse::<EventType>().is_err());
    }

    #[test]
    fn test_result_serialization_shape() {
        let result = score(EventType::Sports, &weather(22.0, 3.0, 0.0, 50.0)).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score"], 100);
        assert_eq!(json["max_score"], 100);
        assert_eq!(json["percentage"], 100);
        assert_eq!(json["rating"], "Excellent");
        assert_eq!(json["details"]["conditions"]["value"], "clear sky");
        assert_eq!(json["details"]["wind"]["value"], 3.0);
    }
}
