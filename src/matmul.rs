//! Small GEMM kernel used by the forward and backward engines.
//!
//! This module provides a single abstraction over matrix multiplication:
//! - default: a simple, safe triple-loop implementation
//! - optional: a faster backend via the `matrixmultiply` feature
//!
//! Both operands can be read transposed, which is all backpropagation needs
//! (`W * A`, `W^T * dZ`, `dZ * A^T`) without materializing any transpose.

use crate::mat::Mat;

/// Computes `out = op(a) * op(b)`, where `op(x)` is `x` or `x^T` per flag.
///
/// Overwrite semantics: `out` is fully overwritten.
///
/// Shape contract (panics on misuse):
/// - `op(a)` is `(m, k)`, `op(b)` is `(k, n)`, `out` is `(m, n)`
pub(crate) fn gemm(ta: bool, tb: bool, a: &Mat, b: &Mat, out: &mut Mat) {
    let (m, k) = if ta {
        (a.cols(), a.rows())
    } else {
        (a.rows(), a.cols())
    };
    let (kb, n) = if tb {
        (b.cols(), b.rows())
    } else {
        (b.rows(), b.cols())
    };

    assert_eq!(k, kb, "inner dims do not match: {k} vs {kb}");
    assert_eq!(
        out.shape(),
        (m, n),
        "out shape {:?} does not match product shape ({m}, {n})",
        out.shape()
    );

    if m == 0 || n == 0 {
        return;
    }
    if k == 0 {
        out.data_mut().fill(0.0);
        return;
    }

    // Row-major strides; a transposed read swaps them.
    let (rsa, csa) = if ta { (1, a.cols()) } else { (a.cols(), 1) };
    let (rsb, csb) = if tb { (1, b.cols()) } else { (b.cols(), 1) };
    let rsc = out.cols();

    #[cfg(feature = "matrixmultiply")]
    {
        unsafe {
            matrixmultiply::dgemm(
                m,
                k,
                n,
                1.0,
                a.data().as_ptr(),
                rsa as isize,
                csa as isize,
                b.data().as_ptr(),
                rsb as isize,
                csb as isize,
                0.0,
                out.data_mut().as_mut_ptr(),
                rsc as isize,
                1,
            );
        }
    }

    #[cfg(not(feature = "matrixmultiply"))]
    {
        let av = a.data();
        let bv = b.data();
        let cv = out.data_mut();
        for i in 0..m {
            for j in 0..n {
                let mut acc = 0.0_f64;
                for p in 0..k {
                    let x = av[i * rsa + p * csa];
                    let y = bv[p * rsb + j * csb];
                    acc = x.mul_add(y, acc);
                }
                cv[i * rsc + j] = acc;
            }
        }
    }
}
