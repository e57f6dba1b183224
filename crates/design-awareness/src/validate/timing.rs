//! Realtime timing validation.
//!
//! A record is the list of on/off pairs of one activity within one session.
//! Every offending pair is reported, not just the first, so a consumer gets
//! a complete repair list in one pass.

use crate::error::TimingViolation;
use crate::model::TimingPair;

/// Offending pairs of a record, by pair index. Empty when the record is valid.
pub type TimingReport = Vec<(usize, TimingViolation)>;

/// Validates one activity record against its session.
///
/// Per pair:
/// - `on >= 0` and `on <= duration`;
/// - an open pair (off `-1`) only as the last pair and only while
///   `session_ongoing`;
/// - otherwise `off > on` and `off <= duration`.
///
/// Across consecutive pairs `(a, b)`: `b.on > a.off`. Pairs may not touch.
pub fn validate_record(
    pairs: &[TimingPair],
    session_duration: u64,
    session_ongoing: bool,
) -> TimingReport {
    let slots: Vec<Option<TimingPair>> = pairs.iter().copied().map(Some).collect();
    validate_slots(&slots, session_duration, session_ongoing)
}

/// Like [`validate_record`], for a record in which some pairs failed to
/// parse (`None`). Every parsed pair is checked on its own; the ordering
/// check against a neighbour only runs when both pairs parsed.
pub(crate) fn validate_slots(
    slots: &[Option<TimingPair>],
    session_duration: u64,
    session_ongoing: bool,
) -> TimingReport {
    let mut report = Vec::new();
    let duration = i64::try_from(session_duration).unwrap_or(i64::MAX);
    let last = slots.len().saturating_sub(1);

    for (i, slot) in slots.iter().enumerate() {
        let Some(pair) = slot else { continue };

        if pair.on < 0 {
            report.push((i, TimingViolation::NegativeOnTime { on: pair.on }));
        } else if pair.on > duration {
            report.push((
                i,
                TimingViolation::OnBeyondDuration {
                    on: pair.on,
                    duration: session_duration,
                },
            ));
        }

        if pair.is_open() {
            if !session_ongoing {
                report.push((i, TimingViolation::OpenPairOnClosedSession));
            } else if i != last {
                report.push((i, TimingViolation::OpenPairNotLast));
            }
        } else {
            if pair.off <= pair.on {
                report.push((
                    i,
                    TimingViolation::OffNotAfterOn {
                        on: pair.on,
                        off: pair.off,
                    },
                ));
            }
            if pair.off > duration {
                report.push((
                    i,
                    TimingViolation::OffBeyondDuration {
                        off: pair.off,
                        duration: session_duration,
                    },
                ));
            }
        }

        let previous = i.checked_sub(1).and_then(|j| slots[j]);
        // An open previous pair is already reported as not last.
        if let Some(previous) = previous.filter(|p| !p.is_open()) {
            if pair.on <= previous.off {
                report.push((
                    i,
                    TimingViolation::OverlapsPrevious {
                        previous_off: previous.off,
                        on: pair.on,
                    },
                ));
            }
        }
    }

    report
}

/// Returns true if the record passes [`validate_record`].
pub fn is_valid_record(pairs: &[TimingPair], session_duration: u64, session_ongoing: bool) -> bool {
    validate_record(pairs, session_duration, session_ongoing).is_empty()
}
