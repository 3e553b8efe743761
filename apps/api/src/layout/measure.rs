//! Measurement collaborator interface.
//!
//! The packer never asks how a height was obtained. Hosts that render blocks
//! off-screen pass their results through `Premeasured`; the resume endpoint uses
//! the font-metric `TextMeasurer`. Either way every block and every child is
//! measured exactly once, before packing starts.

use crate::layout::block::{Block, Fragment, MeasuredBlock, MeasuredFragment};
use crate::layout::error::MeasurementError;

/// Returns heights (excluding margins) in the same unit as the page budget.
///
/// `None` means the collaborator could not measure the target; the run fails
/// with `MeasurementError::Missing` rather than defaulting to zero.
pub trait Measure {
    /// Height of the block's own content, excluding its children.
    fn measure_block(&self, block: &Block) -> Option<f32>;

    fn measure_fragment(&self, block: &Block, fragment: &Fragment) -> Option<f32>;
}

/// Reads the heights already carried on the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Premeasured;

impl Measure for Premeasured {
    fn measure_block(&self, block: &Block) -> Option<f32> {
        // A pure container (only children) has no own content to report.
        match block.measured_height {
            Some(h) => Some(h),
            None if !block.children.is_empty() => Some(0.0),
            None => None,
        }
    }

    fn measure_fragment(&self, _block: &Block, fragment: &Fragment) -> Option<f32> {
        fragment.measured_height
    }
}

/// Measures every block and child once, in document order.
pub fn measure_blocks(
    blocks: &[Block],
    measurer: &dyn Measure,
) -> Result<Vec<MeasuredBlock>, MeasurementError> {
    blocks
        .iter()
        .map(|block| measure_block(block, measurer))
        .collect()
}

fn measure_block(block: &Block, measurer: &dyn Measure) -> Result<MeasuredBlock, MeasurementError> {
    check_margin(block, block.margin_before)?;
    check_margin(block, block.margin_after)?;

    let own_height = checked_height(block, None, measurer.measure_block(block))?;

    let children = block
        .children
        .iter()
        .map(|fragment| {
            let height = checked_height(
                block,
                Some(fragment),
                measurer.measure_fragment(block, fragment),
            )?;
            Ok(MeasuredFragment {
                id: fragment.id.clone(),
                height,
            })
        })
        .collect::<Result<Vec<_>, MeasurementError>>()?;

    Ok(MeasuredBlock {
        id: block.id.clone(),
        section_id: block.section_id.clone(),
        own_height,
        margin_before: block.margin_before,
        margin_after: block.margin_after,
        splittable: block.splittable,
        keep_with_next: block.keep_with_next,
        children,
    })
}

fn checked_height(
    block: &Block,
    fragment: Option<&Fragment>,
    value: Option<f32>,
) -> Result<f32, MeasurementError> {
    let fragment_id = fragment.map(|f| f.id.clone());
    match value {
        None => Err(MeasurementError::Missing {
            block_id: block.id.clone(),
            fragment_id,
        }),
        Some(h) if !h.is_finite() || h < 0.0 => Err(MeasurementError::InvalidHeight {
            block_id: block.id.clone(),
            fragment_id,
            value: h,
        }),
        Some(h) => Ok(h),
    }
}

fn check_margin(block: &Block, value: f32) -> Result<(), MeasurementError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MeasurementError::InvalidMargin {
            block_id: block.id.clone(),
            value,
        })
    }
}
