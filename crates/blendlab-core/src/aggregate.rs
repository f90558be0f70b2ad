use crate::error::BlendError;
use crate::model::{BlendItem, CompositionResult};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept in a composition value.
pub const VALUE_DP: u32 = 2;

/// Roll a blend up into drop-weighted component percentages.
///
/// Each component contributes `percentage / 100 * drops` to its running total;
/// the total is then expressed as a percentage of all drops in the blend and
/// rounded to two decimals. Results are sorted by value, highest first. Equal
/// values keep the order in which the component was first seen (blend order,
/// then composition order). Values carry no trailing zeros, so `38.00` is `38`.
///
/// Percentages are not range-checked, so arithmetic that leaves the `Decimal`
/// range fails with [`BlendError::Overflow`] naming the component.
pub fn aggregate(blend: &[BlendItem]) -> Result<Vec<CompositionResult>, BlendError> {
    let total_drops: u64 = blend.iter().map(|item| u64::from(item.drops)).sum();
    if total_drops == 0 {
        return Ok(Vec::new());
    }

    let mut totals: Vec<(String, Decimal)> = Vec::new();
    for item in blend {
        let drops = Decimal::from(item.drops);
        for component in &item.oil.composition {
            let contribution = component
                .percentage
                .checked_div(Decimal::ONE_HUNDRED)
                .and_then(|share| share.checked_mul(drops))
                .ok_or_else(|| BlendError::Overflow(component.name.clone()))?;
            match totals.iter_mut().find(|(name, _)| *name == component.name) {
                Some((_, total)) => {
                    *total = total
                        .checked_add(contribution)
                        .ok_or_else(|| BlendError::Overflow(component.name.clone()))?;
                }
                None => totals.push((component.name.clone(), contribution)),
            }
        }
    }

    let total_drops = Decimal::from(total_drops);
    let mut results = totals
        .into_iter()
        .map(|(name, total)| {
            let value = total
                .checked_div(total_drops)
                .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or_else(|| BlendError::Overflow(name.clone()))?
                .round_dp_with_strategy(VALUE_DP, RoundingStrategy::MidpointAwayFromZero)
                .normalize();
            Ok(CompositionResult { name, value })
        })
        .collect::<Result<Vec<_>, BlendError>>()?;

    // Stable, so ties stay first-encountered-first.
    results.sort_by(|a, b| b.value.cmp(&a.value));
    Ok(results)
}
