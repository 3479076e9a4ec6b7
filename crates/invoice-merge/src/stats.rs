use crate::constants::SLOTS_PER_PAGE;
use crate::options::MergeOptions;
use crate::types::*;

/// Calculate page statistics for merging `input_count` files.
///
/// Assumes every input rasterizes; skipped files reduce the real count.
pub fn calculate_statistics(
    input_count: usize,
    options: &MergeOptions,
) -> Result<MergeStatistics> {
    options.validate()?;

    if input_count == 0 {
        return Err(MergeError::EmptyInputSet);
    }

    let output_pages = input_count.div_ceil(SLOTS_PER_PAGE);
    let blank_slots = output_pages * SLOTS_PER_PAGE - input_count;

    Ok(MergeStatistics {
        inputs: input_count,
        output_pages,
        blank_slots,
    })
}
