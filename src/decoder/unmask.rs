/// Removal of the data mask
use crate::decoder::function_mask::FunctionMask;
use crate::models::{BitMatrix, MaskPattern};

/// Copy of `cells` with `mask` removed from every data module.
///
/// Function modules are copied unchanged. Applying the same mask twice
/// restores the original grid.
pub fn unmasked(cells: &BitMatrix, mask: MaskPattern, func: &FunctionMask) -> BitMatrix {
    let mut out = cells.clone();
    let size = func.size().min(cells.width()).min(cells.height());
    for row in 0..size {
        for col in 0..size {
            if !func.is_function(col, row) && mask.is_masked(row, col) {
                out.toggle(col, row);
            }
        }
    }
    out
}
