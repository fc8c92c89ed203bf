use crate::{
    section::Section,
    signal::{Peak, Sample},
};

/// Time at which the segment from `(x1, y1)` to `(x2, y2)` reaches
/// `threshold`, by linear interpolation.
pub fn crossing_time(x1: f64, y1: f64, x2: f64, y2: f64, threshold: f64) -> f64 {
    x1 + (x2 - x1) * ((threshold - y1) / (y2 - y1))
}

/// Scan state: peaks already closed, the start time of the open one, and
/// the time the open peak came down onto the threshold, if it has.
#[derive(Debug, Clone, Default)]
struct PeakScan {
    closed: Vec<Peak>,
    open: Option<f64>,
    landed: Option<f64>,
}

impl PeakScan {
    fn close(&mut self, end: f64) {
        if let Some(start) = self.open.take() {
            self.closed.push(Peak::new(start, end));
        }
        self.landed = None;
    }

    fn step(mut self, prev: &Sample, curr: &Sample, threshold: f64) -> Self {
        if prev.value < threshold && curr.value > threshold {
            let start = crossing_time(prev.time, prev.value, curr.time, curr.value, threshold);
            if self.open.is_some() {
                let end = self.landed.unwrap_or(prev.time);
                log::debug!("closing peak at {end} without a falling crossing");
                self.close(end);
            }
            self.open = Some(start);
        } else if prev.value > threshold && curr.value < threshold {
            let end = crossing_time(prev.time, prev.value, curr.time, curr.value, threshold);
            self.close(end);
        } else if self.open.is_some() {
            if prev.value > threshold && curr.value == threshold {
                self.landed = Some(curr.time);
            } else if curr.value > threshold {
                self.landed = None;
            } else if curr.value < threshold {
                // left the threshold downwards: the peak ended where it landed
                if let Some(end) = self.landed {
                    self.close(end);
                }
            }
        }
        self
    }

    fn finish(mut self, last_time: f64) -> Vec<Peak> {
        let end = self.landed.unwrap_or(last_time);
        self.close(end);
        self.closed
    }
}

/// Find the intervals where `series` is above `threshold`.
///
/// Crossing times are linearly interpolated between the samples on either
/// side. A trace that starts above the threshold opens a peak at its first
/// time and one that ends above closes its last peak at its final time.
/// Samples exactly at the threshold are neither above nor below it, so they
/// never open a peak. A peak that comes down onto the threshold and then
/// drops below it, or stays there until the end of the trace, ends at the
/// time of the first on-threshold sample; going back above keeps it open.
///
/// `series` must be sorted by non-decreasing time. Repeated times are
/// accepted; a crossing between two samples at the same time is placed at
/// that time.
pub fn calculate_peaks(series: &[Sample], threshold: f64) -> Vec<Peak> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Vec::new(),
    };

    let initial = PeakScan {
        open: (first.value > threshold).then_some(first.time),
        ..PeakScan::default()
    };

    series
        .windows(2)
        .fold(initial, |scan, pair| scan.step(&pair[0], &pair[1], threshold))
        .finish(last.time)
}

/// Clip `peaks` to the window of `section`.
///
/// Peaks with both bounds inside the window pass unchanged, peaks with one
/// bound inside are truncated at the window edge, and peaks with neither
/// bound inside are dropped.
pub fn filter_peaks_to_section(peaks: &[Peak], section: &Section) -> Vec<Peak> {
    peaks
        .iter()
        .filter_map(|peak| {
            let start_included = section.contains(peak.start);
            let end_included = section.contains(peak.end);
            match (start_included, end_included) {
                (true, true) => Some(*peak),
                (true, false) => Some(Peak {
                    end: section.end,
                    length: section.end - peak.start,
                    ..*peak
                }),
                (false, true) => Some(Peak {
                    start: section.start,
                    length: peak.end - section.start,
                    ..*peak
                }),
                (false, false) => None,
            }
        })
        .collect()
}
