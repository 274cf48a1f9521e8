/// Digital Signature with ECDSA as defined in [section 3.4 of RFC 7518]
///
/// [section 3.4 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.4>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcDSA {
    /// ECDSA using P-256 and SHA-256
    Es256,
    /// ECDSA using P-384 and SHA-384
    Es384,
    /// ECDSA using P-521 and SHA-512
    Es512,
    /// ECDSA using secp256k1 curve and SHA-256
    ///
    /// ECDSA with secp256k1 is defined in [RFC 8812 section 3]
    ///
    /// [RFC 8812 section 3]: <https://datatracker.ietf.org/doc/html/rfc8812#section-3>
    Es256K,
}

impl EcDSA {
    /// The `crv` name of the curve this algorithm is defined over.
    pub const fn curve_name(self) -> &'static str {
        match self {
            Self::Es256 => "P-256",
            Self::Es384 => "P-384",
            Self::Es512 => "P-521",
            Self::Es256K => "secp256k1",
        }
    }

    /// The bit size of the curve order.
    pub const fn curve_bits(self) -> usize {
        match self {
            Self::Es256 | Self::Es256K => 256,
            Self::Es384 => 384,
            Self::Es512 => 521,
        }
    }

    /// The fixed byte width of one signature half (`r` or `s`) and of each key
    /// coordinate, `ceil(bits / 8)`.
    pub const fn coordinate_size(self) -> usize {
        self.curve_bits().div_ceil(8)
    }
}
