//! Escrow booking state machine.
//!
//! A booking is the pair (booking_status, escrow_status). Only four
//! combinations are reachable:
//!
//! ```text
//! confirmed/pending  -> confirmed/held        (hold confirmed)
//! confirmed/held     -> completed/released    (owner completes, funds captured)
//! confirmed/held     -> cancelled/refunded    (either party cancels, funds refunded)
//! ```
//!
//! `released` and `refunded` are terminal. The guards here are pure; the
//! DB layer enforces them a second time via expected-prior-state updates
//! so two concurrent transitions cannot both succeed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Cents;

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

/// Fund-custody status against the payment collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscrowStatus {
    Pending,
    Held,
    Released,
    Refunded,
}

/// Which party triggered a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelledBy {
    Renter,
    Owner,
}

/// A caller-triggered transition on a held booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Complete,
    Cancel,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl EscrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscrowStatus::Pending => "pending",
            EscrowStatus::Held => "held",
            EscrowStatus::Released => "released",
            EscrowStatus::Refunded => "refunded",
        }
    }
}

impl CancelledBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CancelledBy::Renter => "renter",
            CancelledBy::Owner => "owner",
        }
    }
}

impl BookingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingAction::Complete => "complete",
            BookingAction::Cancel => "cancel",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CancelledBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BookingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(CoreError::Validation(format!(
                "unknown booking status '{other}'"
            ))),
        }
    }
}

impl FromStr for EscrowStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EscrowStatus::Pending),
            "held" => Ok(EscrowStatus::Held),
            "released" => Ok(EscrowStatus::Released),
            "refunded" => Ok(EscrowStatus::Refunded),
            other => Err(CoreError::Validation(format!(
                "unknown escrow status '{other}'"
            ))),
        }
    }
}

impl FromStr for CancelledBy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "renter" => Ok(CancelledBy::Renter),
            "owner" => Ok(CancelledBy::Owner),
            other => Err(CoreError::Validation(format!(
                "unknown cancelling party '{other}'"
            ))),
        }
    }
}

/// Guard a complete/cancel transition against the current state pair.
///
/// Both actions require `confirmed/held`. Anything else reports
/// [`CoreError::InvalidState`] carrying the current and attempted state,
/// never a silent no-op.
pub fn ensure_transition(
    booking: BookingStatus,
    escrow: EscrowStatus,
    action: BookingAction,
) -> Result<(), CoreError> {
    if booking == BookingStatus::Confirmed && escrow == EscrowStatus::Held {
        return Ok(());
    }
    Err(CoreError::InvalidState {
        current: format!("{booking}/{escrow}"),
        attempted: action.to_string(),
    })
}

/// How a cancelled booking's held funds split between the renter and
/// the owner.
///
/// The security deposit is not part of `total` and is always released
/// back with the hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundBreakdown {
    /// Amount refunded to the renter, in cents.
    pub refund_amount: Cents,
    /// Cancellation fee retained for the owner, in cents.
    pub fee_retained: Cents,
}

/// Compute the refund split for a cancellation.
///
/// Refundable policies return the full total. Non-refundable policies
/// retain the cancellation fee (clamped to the total) and refund the
/// remainder.
pub fn refund_breakdown(total: Cents, cancellation_fee: Cents, refundable: bool) -> RefundBreakdown {
    if refundable {
        return RefundBreakdown {
            refund_amount: total,
            fee_retained: 0,
        };
    }
    let fee_retained = cancellation_fee.clamp(0, total);
    RefundBreakdown {
        refund_amount: total - fee_retained,
        fee_retained,
    }
}
