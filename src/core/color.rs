use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

pub const SPECTRUM_BANDS: usize = 3;

/// Radiance/reflectance carried as a fixed set of wavelength bands
/// (linear RGB).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Spectrum {
    bands: [f32; SPECTRUM_BANDS],
}

impl Spectrum {
    pub const BLACK: Spectrum = Spectrum { bands: [0.0; SPECTRUM_BANDS] };
    pub const WHITE: Spectrum = Spectrum { bands: [1.0; SPECTRUM_BANDS] };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { bands: [r, g, b] }
    }

    pub fn gray(value: f32) -> Self {
        Self {
            bands: [value; SPECTRUM_BANDS],
        }
    }

    #[allow(dead_code)]
    pub fn band(&self, index: usize) -> f32 {
        self.bands[index]
    }

    pub fn luminance(&self) -> f32 {
        0.299 * self.bands[0] + 0.587 * self.bands[1] + 0.114 * self.bands[2]
    }

    pub fn is_finite(&self) -> bool {
        self.bands.iter().all(|band| band.is_finite())
    }

    pub fn is_black(&self) -> bool {
        self.bands.iter().all(|band| *band == 0.0)
    }
}

impl Add for Spectrum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let mut bands = self.bands;
        for i in 0..SPECTRUM_BANDS {
            bands[i] += rhs.bands[i];
        }
        Self { bands }
    }
}
impl AddAssign for Spectrum {
    fn add_assign(&mut self, rhs: Self) {
        for i in 0..SPECTRUM_BANDS {
            self.bands[i] += rhs.bands[i];
        }
    }
}

impl Sub for Spectrum {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        let mut bands = self.bands;
        for i in 0..SPECTRUM_BANDS {
            bands[i] -= rhs.bands[i];
        }
        Self { bands }
    }
}
impl SubAssign for Spectrum {
    fn sub_assign(&mut self, rhs: Self) {
        for i in 0..SPECTRUM_BANDS {
            self.bands[i] -= rhs.bands[i];
        }
    }
}

impl Mul<f32> for Spectrum {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        let mut bands = self.bands;
        for band in &mut bands {
            *band *= rhs;
        }
        Self { bands }
    }
}
impl MulAssign<f32> for Spectrum {
    fn mul_assign(&mut self, rhs: f32) {
        for band in &mut self.bands {
            *band *= rhs;
        }
    }
}
impl Mul<Spectrum> for f32 {
    type Output = Spectrum;

    fn mul(self, rhs: Spectrum) -> Self::Output {
        rhs * self
    }
}
impl Mul<Spectrum> for Spectrum {
    type Output = Self;

    fn mul(self, rhs: Spectrum) -> Self::Output {
        let mut bands = self.bands;
        for i in 0..SPECTRUM_BANDS {
            bands[i] *= rhs.bands[i];
        }
        Self { bands }
    }
}
impl MulAssign<Spectrum> for Spectrum {
    fn mul_assign(&mut self, rhs: Spectrum) {
        for i in 0..SPECTRUM_BANDS {
            self.bands[i] *= rhs.bands[i];
        }
    }
}

impl Div<f32> for Spectrum {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        self * (1.0 / rhs)
    }
}
impl DivAssign<f32> for Spectrum {
    fn div_assign(&mut self, rhs: f32) {
        let inv = 1.0 / rhs;
        for band in &mut self.bands {
            *band *= inv;
        }
    }
}

impl From<[f32; 3]> for Spectrum {
    fn from(value: [f32; 3]) -> Self {
        Spectrum::new(value[0], value[1], value[2])
    }
}

impl From<Spectrum> for [f32; 3] {
    fn from(value: Spectrum) -> Self {
        value.bands
    }
}
