// Gamma-correct blending for translucent paint, with powf replaced by table lookups.
// Visual: translucent cyan over the camera looks even, without dark fringes.

use std::sync::OnceLock;

use crate::types::Rgba;

pub struct GammaLut {
    // sRGB(0..255) -> linear (0..1) as f32
    srgb_to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255) via 4096-step quantization
    // (index = (linear * 4095).round())
    linear_to_srgb: [u8; 4096],
}

impl GammaLut {
    /// Build both tables.
    pub fn new() -> Self {
        // sRGB -> linear
        let mut s2l = [0.0f32; 256];
        for (v, slot) in s2l.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) };
        }

        // linear -> sRGB (quantized to 4096 steps)
        let mut l2s = [0u8; 4096];
        for (i, slot) in l2s.iter_mut().enumerate() {
            let l = (i as f32) / 4095.0; // 0..1
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { srgb_to_linear: s2l, linear_to_srgb: l2s }
    }

    /// Process-wide table, built on first use.
    pub fn shared() -> &'static GammaLut {
        static LUT: OnceLock<GammaLut> = OnceLock::new();
        LUT.get_or_init(GammaLut::new)
    }

    #[inline]
    pub fn srgb_u8_to_linear(&self, v: u8) -> f32 {
        self.srgb_to_linear[v as usize]
    }

    #[inline]
    pub fn linear_to_srgb_u8(&self, l: f32) -> u8 {
        let idx = (l.clamp(0.0, 1.0) * 4095.0).round() as usize;
        self.linear_to_srgb[idx]
    }

    /// Paint `src` over the 0x00RRGGBB pixel `dst` ("source-over").
    /// Visual: alpha 1 replaces the pixel, alpha 0.3 tints it.
    #[inline]
    pub fn blend(&self, dst: u32, src: Rgba) -> u32 {
        let a = src.a;
        if a <= 0.0 { return dst; }
        if a >= 1.0 {
            return ((src.r as u32) << 16) | ((src.g as u32) << 8) | src.b as u32;
        }
        let inv = 1.0 - a;
        let mix = |d: u8, s: u8| -> u32 {
            let l = a * self.srgb_u8_to_linear(s) + inv * self.srgb_u8_to_linear(d);
            self.linear_to_srgb_u8(l) as u32
        };
        let r = mix((dst >> 16) as u8, src.r);
        let g = mix((dst >> 8) as u8, src.g);
        let b = mix(dst as u8, src.b);
        (r << 16) | (g << 8) | b
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_round_trip() {
        let lut = GammaLut::shared();
        assert_eq!(lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(0)), 0);
        assert_eq!(lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(255)), 255);
    }

    #[test]
    fn blend_extremes() {
        let lut = GammaLut::shared();
        let cyan = Rgba::new(0, 245, 255, 1.0);
        assert_eq!(lut.blend(0x0012_3456, cyan), 0x0000_F5FF);
        assert_eq!(lut.blend(0x0012_3456, cyan.faded(0.0)), 0x0012_3456);
    }

    #[test]
    fn half_blend_over_black_is_brighter_than_naive_average() {
        // Linear-light mixing lifts midtones compared with an sRGB average.
        let lut = GammaLut::shared();
        let out = lut.blend(0, Rgba::new(255, 255, 255, 0.5));
        assert!((out & 0xFF) > 128);
    }
}
