//! Curve adapter.
//!
//! Everything the rest of the workspace needs from the elliptic-curve group goes through this
//! module: base point, scalar parsing, scalar multiplication, point addition, and the 33-byte
//! compressed encoding. Swapping the curve backend means rewriting this file and the width
//! constants in `shroud-core`.
//!
//! ## Compressed Encoding
//!
//! ```text
//! [x-coordinate, 32 bytes big-endian][parity: 0x00 even y, 0x01 odd y]
//! ```
//!
//! Note the parity byte trails the x-coordinate. This is not SEC1 (which leads with 0x02/0x03).

use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::{AffineCoordinates, DecompressPoint};
use k256::elliptic_curve::subtle::Choice;
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, FieldBytes, ProjectivePoint, Scalar, U256};

use shroud_core::constants::{
    FIELD_ELEMENT_SIZE, PARITY_EVEN, PARITY_ODD, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE,
};
use shroud_core::error::{Result, ShroudError};

/// Group element type used throughout the workspace.
pub type Point = ProjectivePoint;

/// Bit length of the group order `n`.
pub const ORDER_BITS: u32 = <Scalar as PrimeField>::NUM_BITS;

/// Returns the curve base point `G`.
pub fn generator() -> Point {
    ProjectivePoint::GENERATOR
}

/// Computes `k·G`.
pub fn mul_base(k: &Scalar) -> Point {
    ProjectivePoint::GENERATOR * k
}

/// Returns true for the point at infinity.
pub fn is_infinity(point: &Point) -> bool {
    point.is_identity().into()
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCALARS
// ═══════════════════════════════════════════════════════════════════════════════

/// Parses a big-endian scalar, accepting only values in `(0, n)`.
pub fn scalar_from_bytes(bytes: &[u8; PRIVATE_KEY_SIZE]) -> Option<Scalar> {
    let scalar: Option<Scalar> = Scalar::from_repr(FieldBytes::from(*bytes)).into();
    scalar.filter(|s| *s != Scalar::ZERO)
}

/// Reduces 32 big-endian bytes modulo `n`.
pub fn reduce_scalar(bytes: &[u8; PRIVATE_KEY_SIZE]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*bytes))
}

/// Serializes a scalar as 32 big-endian bytes.
pub fn scalar_to_bytes(scalar: &Scalar) -> [u8; PRIVATE_KEY_SIZE] {
    scalar.to_bytes().into()
}

// ═══════════════════════════════════════════════════════════════════════════════
// POINT ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Encodes a point in the 33-byte compressed form.
///
/// # Errors
/// Returns `InvalidPoint` for the point at infinity, which has no affine coordinates.
pub fn encode_point(point: &Point) -> Result<[u8; PUBLIC_KEY_SIZE]> {
    if is_infinity(point) {
        return Err(ShroudError::InvalidPoint("point at infinity".into()));
    }
    Ok(encode_affine(&point.to_affine()))
}

/// Encodes an affine point known to be finite.
pub(crate) fn encode_affine(affine: &AffinePoint) -> [u8; PUBLIC_KEY_SIZE] {
    let mut out = [0u8; PUBLIC_KEY_SIZE];
    copy_right_aligned(&affine.x(), &mut out[..FIELD_ELEMENT_SIZE]);
    out[FIELD_ELEMENT_SIZE] = if bool::from(affine.y_is_odd()) {
        PARITY_ODD
    } else {
        PARITY_EVEN
    };
    out
}

/// Decodes the 33-byte compressed form, recovering `y` from `x` and the parity byte.
///
/// # Errors
/// - `InvalidLength` if `bytes` is not 33 bytes long
/// - `InvalidPoint` if the parity byte is not 0/1 or `x` is not on the curve
pub fn decode_point(bytes: &[u8]) -> Result<Point> {
    if bytes.len() != PUBLIC_KEY_SIZE {
        return Err(ShroudError::InvalidLength {
            expected: PUBLIC_KEY_SIZE,
            actual: bytes.len(),
        });
    }

    let y_is_odd = match bytes[FIELD_ELEMENT_SIZE] {
        PARITY_EVEN => Choice::from(0),
        PARITY_ODD => Choice::from(1),
        other => {
            return Err(ShroudError::InvalidPoint(format!(
                "parity byte must be 0x00 or 0x01, got {other:#04x}"
            )))
        }
    };

    let x = FieldBytes::clone_from_slice(&bytes[..FIELD_ELEMENT_SIZE]);
    let affine: Option<AffinePoint> = AffinePoint::decompress(&x, y_is_odd).into();

    affine
        .map(ProjectivePoint::from)
        .ok_or_else(|| ShroudError::InvalidPoint("x-coordinate is not on the curve".into()))
}

/// Writes `src` into `dst` as a fixed-width big-endian integer.
///
/// Shorter input is left-padded with zeros; longer input keeps its low-order bytes.
fn copy_right_aligned(src: &[u8], dst: &mut [u8]) {
    dst.fill(0);
    if src.len() <= dst.len() {
        let start = dst.len() - src.len();
        dst[start..].copy_from_slice(src);
    } else {
        dst.copy_from_slice(&src[src.len() - dst.len()..]);
    }
}
