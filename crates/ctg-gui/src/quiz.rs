use ctg_lib::{CorrectAnswer, VariabilityKind};

/// What the learner has typed or picked for the current strip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LearnerGuess {
    pub baseline: String,
    pub variability: Option<VariabilityKind>,
    pub range_low: String,
    pub range_high: String,
}

impl LearnerGuess {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Match,
    Miss,
    Unanswered,
}

impl Verdict {
    pub fn symbol(&self) -> &'static str {
        match self {
            Verdict::Match => "✔",
            Verdict::Miss => "✘",
            Verdict::Unanswered => "",
        }
    }
}

fn parse_bpm(text: &str) -> Option<f64> {
    text.trim().trim_end_matches("bpm").trim().parse::<f64>().ok()
}

/// Baseline guesses count when they land on the same 5 bpm step.
pub fn grade_baseline(guess: &LearnerGuess, answer: &CorrectAnswer) -> Verdict {
    match parse_bpm(&guess.baseline) {
        None => Verdict::Unanswered,
        Some(bpm) if (bpm - answer.baseline as f64).abs() < 2.5 => Verdict::Match,
        Some(_) => Verdict::Miss,
    }
}

pub fn grade_variability(guess: &LearnerGuess, answer: &CorrectAnswer) -> Verdict {
    match guess.variability {
        None => Verdict::Unanswered,
        Some(kind) if kind.label() == answer.variability_name => Verdict::Match,
        Some(_) => Verdict::Miss,
    }
}

/// Range guesses are compared after rounding, as the answer key displays them.
pub fn grade_range(guess: &LearnerGuess, answer: &CorrectAnswer) -> Verdict {
    match (parse_bpm(&guess.range_low), parse_bpm(&guess.range_high)) {
        (Some(low), Some(high)) => {
            let (key_low, key_high) = answer.rounded_range();
            if low.round() as i64 == key_low && high.round() as i64 == key_high {
                Verdict::Match
            } else {
                Verdict::Miss
            }
        }
        _ => Verdict::Unanswered,
    }
}
