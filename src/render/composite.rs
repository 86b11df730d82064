use crate::foundation::{
    core::FrameRGBA,
    error::{GrainError, GrainResult},
    math::mul_div255_u8,
};

/// Folds the grain layer into the gradient layer the way the exporter
/// approximates an overlay blend:
///
/// `rgb = min(255, rgb + gray * alpha/255)`, `a = min(255, a + alpha)`.
///
/// Both inputs must be straight alpha; the gradient buffer is reused for the
/// straight-alpha result. Channels round to nearest.
pub fn merge_grain(gradient: FrameRGBA, noise: &FrameRGBA) -> GrainResult<FrameRGBA> {
    if gradient.width != noise.width || gradient.height != noise.height {
        return Err(GrainError::validation(format!(
            "grain layer {}x{} does not match gradient layer {}x{}",
            noise.width, noise.height, gradient.width, gradient.height
        )));
    }
    if gradient.premultiplied || noise.premultiplied {
        return Err(GrainError::validation(
            "merge_grain expects straight-alpha buffers",
        ));
    }

    let mut out = gradient;
    for (d, n) in out.data.chunks_exact_mut(4).zip(noise.data.chunks_exact(4)) {
        let alpha = f64::from(n[3]);
        let lift = f64::from(n[0]) * (alpha / 255.0);
        for c in &mut d[..3] {
            *c = (f64::from(*c) + lift).round().min(255.0) as u8;
        }
        d[3] = d[3].saturating_add(n[3]);
    }
    Ok(out)
}

/// Composites a straight-alpha buffer over opaque black and drops alpha.
pub fn flatten_to_rgb(frame: &FrameRGBA) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(frame.pixel_count() * 3);
    for px in frame.data.chunks_exact(4) {
        let a = u16::from(px[3]);
        if frame.premultiplied {
            rgb.extend_from_slice(&px[..3]);
        } else {
            rgb.extend(px[..3].iter().map(|&c| mul_div255_u8(u16::from(c), a)));
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_grain_matches_formula() {
        let mut g = FrameRGBA::transparent(1, 1, false);
        g.data.copy_from_slice(&[100, 250, 0, 200]);
        let mut n = FrameRGBA::transparent(1, 1, false);
        n.data.copy_from_slice(&[200, 200, 200, 102]);

        let out = merge_grain(g, &n).unwrap();
        // 200 * 102/255 = 80
        assert_eq!(out.pixel(0, 0).unwrap(), [180, 255, 80, 255]);
    }

    #[test]
    fn merge_grain_rounds_to_nearest() {
        let mut g = FrameRGBA::transparent(1, 1, false);
        g.data.copy_from_slice(&[10, 10, 10, 255]);
        let mut n = FrameRGBA::transparent(1, 1, false);
        n.data.copy_from_slice(&[3, 3, 3, 128]);

        // 10 + 3 * 128/255 = 11.506
        let out = merge_grain(g, &n).unwrap();
        assert_eq!(out.pixel(0, 0).unwrap(), [12, 12, 12, 255]);
    }

    #[test]
    fn merge_grain_rejects_mismatch() {
        let g = FrameRGBA::transparent(2, 1, false);
        let n = FrameRGBA::transparent(1, 2, false);
        assert!(merge_grain(g.clone(), &n).is_err());
        let p = FrameRGBA::transparent(2, 1, true);
        assert!(merge_grain(p, &g).is_err());
    }

    #[test]
    fn flatten_drops_alpha_over_black() {
        let mut f = FrameRGBA::transparent(2, 1, false);
        f.data.copy_from_slice(&[255, 255, 255, 255, 200, 100, 50, 0]);
        assert_eq!(flatten_to_rgb(&f), vec![255, 255, 255, 0, 0, 0]);
    }
}
