/// `T` equally spaced frame indices in `[0, F)`: `round(k*(F-1)/(T-1))` for
/// `k = 0..T` when `T >= 2`; `[0]` when `T == 1`. Both encoder and decoder
/// derive the same anchor positions from `(F, T)` alone, so nothing but
/// these two numbers needs to travel on the wire.
pub fn sample_positions(frames: u32, coarse_frames: u32) -> Vec<u32> {
    if coarse_frames <= 1 {
        return vec![0];
    }
    (0..coarse_frames)
        .map(|k| {
            let pos = (k as f64) * (frames as f64 - 1.0) / (coarse_frames as f64 - 1.0);
            pos.round() as u32
        })
        .collect()
}

/// Linear interpolation of one channel's coarse track (`anchors[i]` is the
/// known sample at frame `positions[i]`) back to all `frames` positions.
pub fn interpolate_channel(positions: &[u32], anchors: &[i16], frames: u32) -> Vec<i16> {
    if positions.len() == 1 {
        return vec![anchors[0]; frames as usize];
    }
    let mut out = Vec::with_capacity(frames as usize);
    let mut seg = 0usize;
    let last_seg = positions.len() - 2;
    for f in 0..frames {
        while seg < last_seg && positions[seg + 1] <= f {
            seg += 1;
        }
        let (p0, p1) = (positions[seg], positions[seg + 1]);
        let (a0, a1) = (anchors[seg] as f64, anchors[seg + 1] as f64);
        let value = if p1 == p0 {
            a0
        } else {
            let t = (f as f64 - p0 as f64) / (p1 as f64 - p0 as f64);
            a0 + t * (a1 - a0)
        };
        out.push(value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_anchor_is_flat() {
        assert_eq!(sample_positions(100, 1), vec![0]);
        assert_eq!(interpolate_channel(&[0], &[42], 5), vec![42; 5]);
    }

    #[test]
    fn positions_span_full_range() {
        let positions = sample_positions(100, 10);
        assert_eq!(positions.first(), Some(&0));
        assert_eq!(positions.last(), Some(&99));
        assert_eq!(positions.len(), 10);
    }

    #[test]
    fn interpolation_reproduces_anchors_at_anchor_positions() {
        let positions = sample_positions(50, 5);
        let anchors: Vec<i16> = positions.iter().map(|&p| (p as i16) * 2).collect();
        let out = interpolate_channel(&positions, &anchors, 50);
        for (p, a) in positions.iter().zip(anchors.iter()) {
            assert_eq!(out[*p as usize], *a);
        }
    }
}
