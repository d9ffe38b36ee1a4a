use std::cmp::Ordering;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::core::EPS;
use crate::error::{Error, Result};

/// Participants of a candidate contact.
///
/// Pair contacts are normalized so `a < b`; the wall participant sorts as the
/// sentinel value -1, below every particle id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum Contact {
    /// Contact between particles `a` and `b` (`a < b`).
    Pair { a: u32, b: u32 },
    /// Contact between particle `p` and a wall of the box.
    Wall { p: u32 },
}

/// A candidate contact with its time within the current round, in `[0, 1)`
/// up to tolerance. Immutable once created; consumed by the conflict
/// resolver.
#[derive(Debug, Clone, Copy, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct CollisionEvent {
    pub time: f64,
    pub contact: Contact,
}

impl CollisionEvent {
    /// Candidate pair contact; participant order is normalized.
    pub fn pair(a: u32, b: u32, time: f64) -> Result<Self> {
        if a == b {
            return Err(Error::InvalidParam(
                "pair contact needs two distinct participants".into(),
            ));
        }
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        Ok(Self {
            time: checked_time(time)?,
            contact: Contact::Pair { a, b },
        })
    }

    /// Candidate wall contact for particle `p`.
    pub fn wall(p: u32, time: f64) -> Result<Self> {
        Ok(Self {
            time: checked_time(time)?,
            contact: Contact::Wall { p },
        })
    }

    /// Tie-break key: wall contacts take the numeric sentinel -1 for their
    /// first participant, so at equal times they sort before pair contacts
    /// and among themselves by particle id.
    #[inline]
    fn order_key(&self) -> (i64, i64) {
        match self.contact {
            Contact::Wall { p } => (-1, i64::from(p)),
            Contact::Pair { a, b } => (i64::from(a), i64::from(b)),
        }
    }
}

fn checked_time(time: f64) -> Result<f64> {
    if !time.is_finite() {
        return Err(Error::InvalidParam("event time must be finite".into()));
    }
    Ok(time)
}

/// Total order over candidate events: ascending time with `EPS` tolerance,
/// ties broken by the ordered participant key.
///
/// Kept as a top-level pure function so the ordering can be tested apart from
/// the resolver loop.
pub fn event_order(lhs: &CollisionEvent, rhs: &CollisionEvent) -> Ordering {
    if lhs.time > rhs.time + EPS {
        Ordering::Greater
    } else if lhs.time + EPS < rhs.time {
        Ordering::Less
    } else {
        lhs.order_key().cmp(&rhs.order_key())
    }
}
