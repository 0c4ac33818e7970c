// Vertex influence selection

/// Influences one skinned vertex can carry to the GPU.
pub const MAX_GPU_INFLUENCES: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Influences {
    pub bone_ids: [u32; MAX_GPU_INFLUENCES],
    pub weights: [f32; MAX_GPU_INFLUENCES],
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightSelection {
    pub influences: Influences,
    /// Bones whose influence was dropped to fit the limit.
    pub dropped: Vec<u16>,
    /// The kept weights summed to zero and could not be renormalized.
    pub zero_sum: bool,
}

/// Reduces `(bone, weight)` pairs to at most `limit` influences.
///
/// Up to `limit` pairs are copied unchanged. Beyond that the `limit` largest
/// weights by magnitude are kept (ties keep file order) and renormalized to sum to 1.
pub fn select_influences(pairs: &[(u16, f32)], limit: usize) -> WeightSelection {
    let limit = limit.clamp(1, MAX_GPU_INFLUENCES);
    let mut selection = WeightSelection::default();

    if pairs.len() <= limit {
        for (slot, &(bone, weight)) in pairs.iter().enumerate() {
            selection.influences.bone_ids[slot] = bone as u32;
            selection.influences.weights[slot] = weight;
        }
        selection.influences.count = pairs.len();
        return selection;
    }

    let mut order: Vec<usize> = (0..pairs.len()).collect();
    // Stable sort, so equal magnitudes stay in file order.
    order.sort_by(|&a, &b| pairs[b].1.abs().total_cmp(&pairs[a].1.abs()));

    let (kept, dropped) = order.split_at(limit);
    let sum: f32 = kept.iter().map(|&i| pairs[i].1).sum();
    selection.zero_sum = !(sum.is_finite() && sum.abs() > f32::EPSILON);

    for (slot, &i) in kept.iter().enumerate() {
        let (bone, weight) = pairs[i];
        selection.influences.bone_ids[slot] = bone as u32;
        selection.influences.weights[slot] = if selection.zero_sum { weight } else { weight / sum };
    }
    selection.influences.count = limit;
    selection.dropped = dropped.iter().map(|&i| pairs[i].0).collect();

    selection
}
