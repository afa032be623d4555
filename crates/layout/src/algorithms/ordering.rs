/// Input indices in the order sections will be placed.
///
/// Without sorting the input order is authoritative. With sorting, taller
/// sections come first; equal heights fall back to ascending priority and then
/// to input order (the sort is stable).
pub fn working_order(heights: &[f32], priorities: &[i32], sort_by_height: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..heights.len()).collect();
    if sort_by_height {
        order.sort_by(|&a, &b| {
            heights[b]
                .total_cmp(&heights[a])
                .then_with(|| priority(priorities, a).cmp(&priority(priorities, b)))
        });
    }
    order
}

fn priority(priorities: &[i32], index: usize) -> i32 {
    priorities.get(index).copied().unwrap_or(0)
}
