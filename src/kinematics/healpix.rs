//! # Equal-area spherical pixelization (ring scheme)
//!
//! This module implements the **HEALPix ring-ordered pixelization** of the
//! unit sphere, used to histogram particle angular-momentum directions.
//! HEALPix partitions the sphere into `12 * nside^2` pixels of exactly equal
//! area, arranged on `4*nside - 1` rings of constant latitude.
//!
//! ## Core concepts
//!
//! - The sphere splits into three zones by `z = cos(colatitude)`:
//!   - north polar cap, `z > 2/3`
//!   - equatorial belt, `|z| <= 2/3`
//!   - south polar cap, `z < -2/3`
//! - Cap ring `i` (counted from the pole) holds `4*i` pixels; every
//!   equatorial ring holds `4*nside` pixels.
//! - Ring ordering numbers pixels north to south, west to east within each
//!   ring, so a pixel index decomposes into (ring, position-in-ring).
//!
//! Only the two operations the orientation map needs are provided:
//! direction -> pixel index, and pixel index -> center direction.

// =======================================================================================================
// References:
// Gorski et al. 2005, ApJ 622, 759 (the HEALPix paper, appendix pixel equations)
// the reference C implementation https://healpix.sourceforge.io (ang2pix_ring / pix2ang_ring)
// =======================================================================================================

use std::f64::consts::PI;

/// A fixed-resolution ring-ordered pixelization of the unit sphere.
///
/// `nside` is the number of divisions along the side of a base-resolution
/// pixel; the total pixel count is `12 * nside^2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingGrid {
    nside: u64,
}

impl RingGrid {
    pub fn new(nside: u32) -> Self {
        assert!(nside >= 1, "nside must be at least 1");
        Self { nside: nside as u64 }
    }

    pub fn nside(&self) -> u32 {
        self.nside as u32
    }

    /// Total number of pixels, 12 * nside^2
    pub fn npix(&self) -> usize {
        (12 * self.nside * self.nside) as usize
    }

    /// Number of pixels in both polar caps together is 4 * ncap_rings^2;
    /// this is the index of the first equatorial-belt pixel
    fn ncap(&self) -> u64 {
        2 * self.nside * (self.nside - 1)
    }

    /// Map a direction given as (longitude, latitude) in radians to its ring
    /// pixel index.
    ///
    /// Longitude is measured around +z from +x (any real value is accepted
    /// and wrapped), latitude from the equator, in [-pi/2, pi/2].
    pub fn ang_to_pix(&self, lon: f64, lat: f64) -> usize {
        let nside = self.nside as f64;

        // z = cos(colatitude) = sin(latitude)
        let z = lat.sin().clamp(-1.0, 1.0);
        let za = z.abs();

        // Azimuth scaled to [0, 4): one unit per base-pixel quadrant
        let mut tt = lon.rem_euclid(2.0 * PI) / (PI / 2.0);
        if tt >= 4.0 {
            tt = 0.0;
        }

        if za <= 2.0 / 3.0 {
            // -----------------------------------------------------------------
            // Equatorial belt.
            //
            // Pixel boundaries here are two families of straight lines in the
            // (tt, z) cylindrical projection: "ascending" lines jp and
            // "descending" lines jm. The pair (jp, jm) locates the pixel:
            // their difference gives the ring, their sum the position in it.
            // -----------------------------------------------------------------
            let temp1 = nside * (0.5 + tt);
            let temp2 = nside * z * 0.75;

            let jp = (temp1 - temp2) as i64; // ascending edge line index
            let jm = (temp1 + temp2) as i64; // descending edge line index

            // Ring number counted from the z = 2/3 boundary, in 1..=2n+1
            let n = self.nside as i64;
            let ir = n + 1 + jp - jm;
            // Rings alternate in phase; odd rings are offset by half a pixel
            let kshift = 1 - (ir & 1);

            let ip = ((jp + jm + kshift + 1 - n) / 2).rem_euclid(4 * n);

            (self.ncap() as i64 + (ir - 1) * 4 * n + ip) as usize
        } else {
            // -----------------------------------------------------------------
            // Polar caps.
            //
            // Cap ring i (from the nearer pole) sits at z = +-(1 - i^2/(3n^2))
            // and holds 4i pixels. The fractional position within the base
            // quadrant (tp) and the scaled colatitude (tmp) give the two
            // boundary line indices, whose sum is the ring number.
            // -----------------------------------------------------------------
            let tp = tt.fract();
            let tmp = nside * (3.0 * (1.0 - za)).sqrt();

            let jp = (tp * tmp) as u64;
            let jm = ((1.0 - tp) * tmp) as u64;

            // Ring number counted from the closest pole
            let ir = jp + jm + 1;
            let mut ip = (tt * ir as f64) as u64;
            ip %= 4 * ir;

            if z > 0.0 {
                (2 * ir * (ir - 1) + ip) as usize
            } else {
                (12 * self.nside * self.nside - 2 * ir * (ir + 1) + ip) as usize
            }
        }
    }

    /// Center direction of a pixel as (longitude, latitude) in radians,
    /// longitude in [0, 2pi), latitude in [-pi/2, pi/2].
    pub fn pix_center(&self, pix: usize) -> (f64, f64) {
        assert!(pix < self.npix(), "pixel index {pix} out of range");

        let nside = self.nside;
        let npix = (12 * nside * nside) as u64;
        let ncap = self.ncap();
        let p = pix as u64;

        let (z, lon) = if p < ncap {
            // North polar cap: ring i holds pixels [2i(i-1), 2i(i+1))
            let iring = (1 + isqrt(1 + 2 * p)) / 2;
            let iphi = p + 1 - 2 * iring * (iring - 1);

            let z = 1.0 - (iring * iring) as f64 / (3.0 * (nside * nside) as f64);
            let lon = (iphi as f64 - 0.5) * PI / (2.0 * iring as f64);
            (z, lon)
        } else if p < npix - ncap {
            // Equatorial belt: all rings hold 4*nside pixels, alternating in
            // phase by half a pixel width
            let ip = p - ncap;
            let iring = ip / (4 * nside) + nside; // counted from the north pole
            let iphi = ip % (4 * nside) + 1;

            // 1.0 for rings offset by half a pixel, 0.5 otherwise
            let fodd = if (iring + nside) & 1 == 1 { 1.0 } else { 0.5 };

            let z = (2.0 * nside as f64 - iring as f64) * 2.0 / (3.0 * nside as f64);
            let lon = (iphi as f64 - fodd) * PI / (2.0 * nside as f64);
            (z, lon)
        } else {
            // South polar cap: mirror of the north cap
            let ip = npix - p;
            let iring = (1 + isqrt(2 * ip - 1)) / 2;
            let iphi = 4 * iring + 1 - (ip - 2 * iring * (iring - 1));

            let z = -1.0 + (iring * iring) as f64 / (3.0 * (nside * nside) as f64);
            let lon = (iphi as f64 - 0.5) * PI / (2.0 * iring as f64);
            (z, lon)
        };

        (lon.rem_euclid(2.0 * PI), z.clamp(-1.0, 1.0).asin())
    }
}

/// Integer square root, exact for the small operands used here
fn isqrt(v: u64) -> u64 {
    let mut r = (v as f64).sqrt() as u64;
    while (r + 1) * (r + 1) <= v {
        r += 1;
    }
    while r * r > v {
        r -= 1;
    }
    r
}
