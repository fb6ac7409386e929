//! Image-source lattice walk
//!
//! Mirror images of the source sit on a 3D lattice indexed by `(mx, my, mz)`,
//! each cell holding eight images selected by the reflection signs
//! `(q, j, k)`. For every image the walk computes the distance to the
//! microphone, the wall attenuation accumulated along the way and the
//! directional gain, then injects a windowed-sinc pulse at the arrival time.
//!
//! All lengths are converted to sample units (divided by cTs) up front, so a
//! distance is directly an arrival time in samples.
//!
//! ## Parallel walk
//!
//! The mx axis is cut into at most [`MAX_SLABS`] contiguous slabs. Each slab
//! accumulates into a private buffer on the rayon pool and the partial buffers
//! are then summed in slab order. Slab boundaries depend only on the lattice
//! extent, so the result does not change with the number of worker threads.

use rayon::prelude::*;
use rir_core::{
    MicrophoneOrientation, ReflectionOrderLimit, RirParams, Sample, Vec3, WallReflectionCoefficients,
};
use std::f64::consts::PI;
use std::ops::{AddAssign, RangeInclusive};

use crate::beam::{BeamFn, beam_fn};
use crate::kernel::{FractionalDelayKernel, tap_count};

/// Upper bound on partial buffers held by the parallel walk
pub const MAX_SLABS: usize = 32;

/// Counters collected during one lattice walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatticeStats {
    /// Images enumerated
    pub visited: u64,
    /// Images within the reflection-order limit
    pub admitted: u64,
    /// Images that arrived inside the response and were injected
    pub injected: u64,
}

impl AddAssign for LatticeStats {
    fn add_assign(&mut self, rhs: Self) {
        self.visited += rhs.visited;
        self.admitted += rhs.admitted;
        self.injected += rhs.injected;
    }
}

/// `beta^exp`, with an explicit `beta^0 = 1` even for `beta = 0`
#[inline]
fn reflection_power(beta: f64, exp: u64) -> f64 {
    if exp == 0 { 1.0 } else { beta.powi(exp as i32) }
}

/// Per-axis image data for one (lattice index, sign) pair
#[derive(Debug, Clone, Copy)]
struct AxisImage {
    offset: f64,
    attenuation: f64,
    order: u64,
}

/// Scene prepared in sample units for the lattice walk
#[derive(Debug, Clone)]
pub struct ImageLatticeAccumulator {
    mic: [f64; 3],
    source: [f64; 3],
    room: [f64; 3],
    extents: [i64; 3],
    walls: WallReflectionCoefficients,
    orientation: MicrophoneOrientation,
    beam: BeamFn,
    order: ReflectionOrderLimit,
    meters_per_sample: f64,
    taps: usize,
    len: usize,
}

impl ImageLatticeAccumulator {
    /// Prepare the walk for a response of `len` samples
    pub fn new(params: &RirParams, len: usize) -> Self {
        let cts = params.meters_per_sample();
        let room = params.room.to_vec3().scale(1.0 / cts).to_array();
        let extents = room.map(|l| (len as f64 / (2.0 * l)).ceil() as i64);

        Self {
            mic: params.mic.scale(1.0 / cts).to_array(),
            source: params.source.scale(1.0 / cts).to_array(),
            room,
            extents,
            walls: params.walls,
            orientation: params.orientation,
            beam: beam_fn(params.pattern),
            order: params.order,
            meters_per_sample: cts,
            taps: tap_count(params.sample_rate),
            len,
        }
    }

    /// Lattice half-extents `[n1, n2, n3]`
    pub fn extents(&self) -> [i64; 3] {
        self.extents
    }

    /// Kernel length used for every image
    pub fn tap_len(&self) -> usize {
        self.taps
    }

    /// Number of images the walk enumerates
    pub fn image_count(&self) -> u64 {
        self.extents
            .iter()
            .map(|&n| (2 * n + 1) as u64)
            .product::<u64>()
            * 8
    }

    /// Walk the whole lattice on the calling thread, adding into `buffer`
    ///
    /// Only the first `len` samples given at construction are written.
    pub fn accumulate(&self, buffer: &mut [Sample]) -> LatticeStats {
        let mut kernel = FractionalDelayKernel::with_len(self.taps);
        let mut stats = LatticeStats::default();
        let n1 = self.extents[0];
        self.accumulate_slab(-n1..=n1, self.output(buffer), &mut kernel, &mut stats);
        stats
    }

    /// Walk the lattice on the rayon pool, adding into `buffer`
    pub fn accumulate_parallel(&self, buffer: &mut [Sample]) -> LatticeStats {
        let n1 = self.extents[0];
        let rows = (2 * n1 + 1) as usize;
        let slab_width = rows.div_ceil(MAX_SLABS).max(1);
        let slabs: Vec<RangeInclusive<i64>> = (0..rows)
            .step_by(slab_width)
            .map(|start| {
                let lo = -n1 + start as i64;
                let hi = (lo + slab_width as i64 - 1).min(n1);
                lo..=hi
            })
            .collect();

        log::debug!(
            "Parallel lattice walk: {} slabs of {} rows on {} threads",
            slabs.len(),
            slab_width,
            rayon::current_num_threads()
        );

        let partials: Vec<(Vec<Sample>, LatticeStats)> = slabs
            .into_par_iter()
            .map(|slab| {
                let mut partial = vec![0.0; self.len];
                let mut kernel = FractionalDelayKernel::with_len(self.taps);
                let mut stats = LatticeStats::default();
                self.accumulate_slab(slab, &mut partial, &mut kernel, &mut stats);
                (partial, stats)
            })
            .collect();

        let out = self.output(buffer);
        let mut stats = LatticeStats::default();
        for (partial, slab_stats) in partials {
            for (dst, src) in out.iter_mut().zip(&partial) {
                *dst += src;
            }
            stats += slab_stats;
        }
        stats
    }

    fn output<'a>(&self, buffer: &'a mut [Sample]) -> &'a mut [Sample] {
        let len = self.len.min(buffer.len());
        &mut buffer[..len]
    }

    fn axis_image(&self, axis: usize, m: i64, sign: i64) -> AxisImage {
        let mirrored = (1 - 2 * sign) as f64 * self.source[axis];
        let shift = 2.0 * m as f64 * self.room[axis];
        AxisImage {
            offset: mirrored - self.mic[axis] + shift,
            attenuation: reflection_power(self.walls.near(axis), (m - sign).unsigned_abs())
                * reflection_power(self.walls.far(axis), m.unsigned_abs()),
            order: (2 * m - sign).unsigned_abs(),
        }
    }

    fn accumulate_slab(
        &self,
        rows: RangeInclusive<i64>,
        out: &mut [Sample],
        kernel: &mut FractionalDelayKernel,
        stats: &mut LatticeStats,
    ) {
        let [_, n2, n3] = self.extents;

        for mx in rows {
            for my in -n2..=n2 {
                for mz in -n3..=n3 {
                    for q in 0..=1 {
                        let ix = self.axis_image(0, mx, q);
                        for j in 0..=1 {
                            let iy = self.axis_image(1, my, j);
                            for k in 0..=1 {
                                let iz = self.axis_image(2, mz, k);
                                stats.visited += 1;

                                let order = ix.order + iy.order + iz.order;
                                if !self.order.admits(u32::try_from(order).unwrap_or(u32::MAX)) {
                                    continue;
                                }
                                stats.admitted += 1;

                                if self.inject(out, kernel, ix, iy, iz) {
                                    stats.injected += 1;
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Add one image's pulse. Returns false if it arrives after the response ends.
    #[inline]
    fn inject(
        &self,
        out: &mut [Sample],
        kernel: &mut FractionalDelayKernel,
        ix: AxisImage,
        iy: AxisImage,
        iz: AxisImage,
    ) -> bool {
        let offset = Vec3::new(ix.offset, iy.offset, iz.offset);
        let dist = offset.norm();
        let fdist = dist.floor();
        if fdist.is_nan() || fdist >= self.len as f64 {
            return false;
        }

        let gain = (self.beam)(offset, self.orientation) * ix.attenuation * iy.attenuation * iz.attenuation
            / (4.0 * PI * dist * self.meters_per_sample);

        let start = fdist as i64 + kernel.start_offset();
        let taps = kernel.taps(dist - fdist);

        // Clip the tap range to [0, len)
        let first = (-start).clamp(0, taps.len() as i64) as usize;
        let last = (out.len() as i64 - start).clamp(0, taps.len() as i64) as usize;
        if first >= last {
            return true;
        }

        let dst = &mut out[(start + first as i64) as usize..(start + last as i64) as usize];
        for (sample, tap) in dst.iter_mut().zip(&taps[first..last]) {
            *sample += gain * tap;
        }
        true
    }
}
