//! Fixed-weight 1-D convolution with "same" output length.
//!
//! The kernel is centred on each output sample and truncated at the edges of
//! the input: out-of-range taps are omitted rather than treated as zeros, so
//! edge outputs are the sum of fewer weighted terms.
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConvolutionError {
    #[error("The kernel length must be an odd number, received {0}")]
    EvenKernel(usize),
    #[error("The boxcar width must be an odd number of at least 1, received {0}")]
    InvalidWidth(usize),
}

/// Convolve `array` with `weights`, returning a vector of the same length as
/// `array`.
///
/// `output[i] = Σ_k array[i - offset + k] * weights[k]` with
/// `offset = weights.len() / 2`, summed over the `k` that index into `array`.
pub fn convolve(array: &[f64], weights: &[f64]) -> Result<Vec<f64>, ConvolutionError> {
    let wl = weights.len();
    if wl % 2 != 1 {
        return Err(ConvolutionError::EvenKernel(wl));
    }
    let al = array.len();
    let offset = wl / 2;
    let mut output = Vec::with_capacity(al);
    for i in 0..al {
        let kmin = offset.saturating_sub(i);
        let kmax = if i + offset < al {
            wl - 1
        } else {
            al - 1 - i + offset
        };
        let mut acc = 0.0;
        for k in kmin..=kmax {
            acc += array[i + k - offset] * weights[k];
        }
        output.push(acc);
    }
    Ok(output)
}

/// Uniform moving-average kernel of `width` taps, each `1 / width`.
pub fn boxcar(width: usize) -> Result<Vec<f64>, ConvolutionError> {
    if width == 0 || width % 2 == 0 {
        return Err(ConvolutionError::InvalidWidth(width));
    }
    Ok(vec![1.0 / width as f64; width])
}
