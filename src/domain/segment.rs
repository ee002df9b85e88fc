//! Segment - Patient segment scoring
//!
//! Fisher linear discriminant over six Likert answers (1 to 7). Each of the
//! four segments has one coefficient per question plus a constant; the
//! segment with the highest score is the prediction.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Question ids in coefficient order
pub const QUESTION_IDS: [&str; 6] = ["Q1C", "Q1D", "Q1E", "Q1G", "Q1H", "Q1I"];

/// Segment display names, segment 1 first
pub const SEGMENT_NAMES: [&str; 4] = [
    "Proactive Skeptic",
    "Disengaged Health Risker",
    "Uncertain Reliant",
    "Proactive Reliant",
];

/// Lowest and highest accepted answer
pub const ANSWER_RANGE: std::ops::RangeInclusive<u8> = 1..=7;

/// Per segment: Q1C, Q1D, Q1E, Q1G, Q1H, Q1I, constant
const COEFFICIENTS: [[f64; 7]; 4] = [
    [
        1.19039386181128,
        1.03649003888297,
        5.73080695087478,
        0.950006005564725,
        1.31397531723995,
        12.3204392841062,
        -67.0071796306531,
    ],
    [
        1.78620928911771,
        1.59614399842169,
        4.43116102793981,
        1.36609926239298,
        1.73853547911897,
        10.342074596288,
        -53.3533516286633,
    ],
    [
        2.35357338157844,
        2.21098553671086,
        5.79236522953596,
        2.43973793784768,
        3.05180646916346,
        12.4155836229025,
        -89.094787981231,
    ],
    [
        2.50469315181857,
        2.45366871961806,
        5.72743514501501,
        0.833022711669993,
        1.1325747318316,
        12.2565135200598,
        -78.485754726542,
    ],
];

/// Questionnaire answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Responses {
    #[serde(rename = "Q1C")]
    pub q1c: u8,
    #[serde(rename = "Q1D")]
    pub q1d: u8,
    #[serde(rename = "Q1E")]
    pub q1e: u8,
    #[serde(rename = "Q1G")]
    pub q1g: u8,
    #[serde(rename = "Q1H")]
    pub q1h: u8,
    #[serde(rename = "Q1I")]
    pub q1i: u8,
}

impl Responses {
    /// Build from answers in [`QUESTION_IDS`] order, validating the range
    pub fn new(answers: [u8; 6]) -> Result<Self> {
        let [q1c, q1d, q1e, q1g, q1h, q1i] = answers;
        let responses = Self {
            q1c,
            q1d,
            q1e,
            q1g,
            q1h,
            q1i,
        };
        responses.validate()?;
        Ok(responses)
    }

    /// Answers in [`QUESTION_IDS`] order
    pub fn answers(&self) -> [u8; 6] {
        [self.q1c, self.q1d, self.q1e, self.q1g, self.q1h, self.q1i]
    }

    pub fn validate(&self) -> Result<()> {
        for (id, answer) in QUESTION_IDS.iter().zip(self.answers()) {
            if !ANSWER_RANGE.contains(&answer) {
                return Err(Error::Invalid {
                    message: format!(
                        "{id} must be between {} and {}, got {answer}",
                        ANSWER_RANGE.start(),
                        ANSWER_RANGE.end()
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Predicted segment with every segment's score
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentResult {
    /// 1-based segment number
    pub segment: u8,
    pub segment_name: &'static str,
    /// Scores for segments 1 to 4
    pub scores: [f64; 4],
}

impl SegmentResult {
    /// `(segment number, score)` pairs, segment 1 first
    pub fn numbered_scores(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        (1u8..).zip(self.scores.iter().copied())
    }

    /// `Segment N: x.xx` lines joined with newlines
    pub fn scores_text(&self) -> String {
        self.numbered_scores()
            .map(|(n, score)| format!("Segment {n}: {score:.2}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Display name of a 1-based segment number
pub fn segment_name(segment: u8) -> Option<&'static str> {
    SEGMENT_NAMES.get(usize::from(segment).checked_sub(1)?).copied()
}

fn score(coefficients: &[f64; 7], answers: [u8; 6]) -> f64 {
    let weighted = coefficients
        .iter()
        .zip(answers)
        .fold(0.0, |acc, (c, a)| acc + f64::from(a) * c);
    weighted + coefficients[6]
}

/// Score every segment and pick the highest; exact ties go to the
/// lowest-numbered segment.
pub fn calculate(responses: &Responses) -> Result<SegmentResult> {
    responses.validate()?;
    let answers = responses.answers();

    let scores = COEFFICIENTS.map(|c| score(&c, answers));

    let mut best = 0;
    for (i, s) in scores.iter().enumerate().skip(1) {
        if *s > scores[best] {
            best = i;
        }
    }

    let segment = best as u8 + 1;
    tracing::debug!(segment, ?scores, "Segment calculated");

    Ok(SegmentResult {
        segment,
        segment_name: SEGMENT_NAMES[best],
        scores,
    })
}
