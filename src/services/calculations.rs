// src/services/calculations.rs
use crate::models::{HistoricalClose, MarketContext, Overreaction, PriceWindows, SymbolMetrics};

/// Nominal trading-day offsets into a most-recent-first close series.
/// Approximations for week/month/quarter/year; not calendar-exact around
/// holidays.
pub const WEEK_OFFSET: usize = 5;
pub const MONTH_OFFSET: usize = 22;
pub const QUARTER_OFFSET: usize = 66;
pub const YEAR_OFFSET: usize = 252;

pub const DEFAULT_OVERREACTION_THRESHOLD: f64 = 2.0;

/// When there is no surprise at all, any abnormal move above this absolute
/// magnitude (in percentage points) counts as an overreaction.
const ZERO_SURPRISE_MOVE_THRESHOLD: f64 = 1.0;

/// Percentage change from `previous` to `current`, in percentage points.
/// `None` if either input is absent or `previous` is zero.
pub fn calculate_price_change(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    match (current, previous) {
        (Some(cur), Some(prev)) if prev != 0.0 => Some((cur - prev) / prev * 100.0),
        _ => None,
    }
}

/// EPS surprise: deviation of actual from estimated EPS, in percentage
/// points. A zero estimate is a defined special case yielding exactly 0.0,
/// never a division. No rounding here; formatting is the caller's concern.
pub fn calculate_earnings_surprise(
    eps_actual: Option<f64>,
    eps_estimated: Option<f64>,
) -> Option<f64> {
    let actual = eps_actual?;
    let estimated = eps_estimated?;
    if estimated == 0.0 {
        return Some(0.0);
    }
    Some((actual - estimated) / estimated.abs() * 100.0)
}

/// CAPM abnormal return, all inputs in percentage points:
///
///   expected = risk_free + beta * (market - risk_free)
///   abnormal = actual - expected
///
/// `None` unless all four inputs are present; partial computation is never
/// attempted. The output is unbounded.
pub fn calculate_abnormal_return(
    actual_return: Option<f64>,
    market_return: Option<f64>,
    beta: Option<f64>,
    risk_free_rate: Option<f64>,
) -> Option<f64> {
    let actual = actual_return?;
    let market = market_return?;
    let beta = beta?;
    let risk_free = risk_free_rate?;

    let expected_return = risk_free + beta * (market - risk_free);
    Some(actual - expected_return)
}

/// How the overreaction verdict is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverreactionStrategy {
    /// Compare the CAPM abnormal return against the surprise, requiring the
    /// move to point in the same direction as the surprise.
    CapmAdjusted,
    /// Compare the raw price change against the surprise magnitude only.
    /// Fallback for when beta or market context is unavailable.
    RawMagnitude,
}

/// Classifies a move as an overreaction to an earnings surprise.
///
/// `return_pct` is the abnormal return under `CapmAdjusted` and the raw
/// price change under `RawMagnitude`. A move is flagged "Yes" when it is
/// disproportionately large relative to the surprise (more than
/// `threshold` times its magnitude) and, under `CapmAdjusted`, also points
/// in the same direction as the surprise. Zero counts as same-direction.
/// A large move against the surprise is "No", not its own category.
pub fn determine_overreaction(
    strategy: OverreactionStrategy,
    return_pct: Option<f64>,
    eps_surprise: Option<f64>,
    threshold: f64,
) -> Overreaction {
    let (ret, surprise) = match (return_pct, eps_surprise) {
        (Some(r), Some(s)) => (r, s),
        _ => return Overreaction::Unknown,
    };

    if surprise == 0.0 {
        // No surprise: any significant move is an overreaction.
        return if ret.abs() > ZERO_SURPRISE_MOVE_THRESHOLD {
            Overreaction::Yes
        } else {
            Overreaction::No
        };
    }

    let disproportionate = ret.abs() > surprise.abs() * threshold;
    match strategy {
        OverreactionStrategy::CapmAdjusted => {
            let same_direction = ret * surprise >= 0.0;
            if disproportionate && same_direction {
                Overreaction::Yes
            } else {
                Overreaction::No
            }
        }
        OverreactionStrategy::RawMagnitude => {
            if disproportionate {
                Overreaction::Yes
            } else {
                Overreaction::No
            }
        }
    }
}

/// Windowed changes from the most recent close back to the nominal
/// week/month/quarter/year offsets. A window whose offset runs past the
/// end of the series is absent.
pub fn windowed_changes(closes: &[HistoricalClose]) -> PriceWindows {
    let current = closes.first().map(|c| c.close);
    let at = |offset: usize| closes.get(offset).map(|c| c.close);

    PriceWindows {
        week: calculate_price_change(current, at(WEEK_OFFSET)),
        month: calculate_price_change(current, at(MONTH_OFFSET)),
        quarter: calculate_price_change(current, at(QUARTER_OFFSET)),
        year: calculate_price_change(current, at(YEAR_OFFSET)),
    }
}

/// Derives the full metric set for one symbol from its raw inputs and the
/// shared market context. Pure and total: missing inputs flow through as
/// absent results, never as errors.
#[allow(clippy::too_many_arguments)]
pub fn compute_symbol_metrics(
    symbol: &str,
    eps_actual: Option<f64>,
    eps_estimated: Option<f64>,
    current_price: Option<f64>,
    previous_close: Option<f64>,
    beta: Option<f64>,
    ctx: &MarketContext,
    strategy: OverreactionStrategy,
    threshold: f64,
) -> SymbolMetrics {
    let eps_surprise_pct = calculate_earnings_surprise(eps_actual, eps_estimated);
    let actual_return_pct = calculate_price_change(current_price, previous_close);
    let abnormal_return_pct = calculate_abnormal_return(
        actual_return_pct,
        Some(ctx.market_return),
        beta,
        Some(ctx.risk_free_rate),
    );

    let basis = match strategy {
        OverreactionStrategy::CapmAdjusted => abnormal_return_pct,
        OverreactionStrategy::RawMagnitude => actual_return_pct,
    };
    let overreaction = determine_overreaction(strategy, basis, eps_surprise_pct, threshold);

    SymbolMetrics {
        symbol: symbol.to_string(),
        eps_surprise_pct,
        actual_return_pct,
        abnormal_return_pct,
        overreaction,
    }
}
