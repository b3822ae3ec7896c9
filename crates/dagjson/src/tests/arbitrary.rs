use cid::{Cid, multihash::Multihash};
use num_bigint::BigInt;
use quickcheck::{Arbitrary, Gen};

use crate::{List, Map, Value};

/// Single-byte codec code, so a base32 CIDv1 stays within the default link
/// length.
const DAG_CBOR: u64 = 0x71;
const SHA2_256: u64 = 0x12;

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct FiniteFloat(pub(crate) f64);

impl Arbitrary for FiniteFloat {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        Self(value)
    }
}

fn gen_cid(g: &mut Gen) -> Cid {
    let mut digest = [0u8; 32];
    for b in &mut digest {
        *b = u8::arbitrary(g);
    }
    let hash = Multihash::<64>::wrap(SHA2_256, &digest).unwrap();
    if bool::arbitrary(g) {
        Cid::new_v1(DAG_CBOR, hash)
    } else {
        Cid::new_v0(hash).unwrap()
    }
}

/// Map keys other than `"/"`, which only sentinels may use.
fn gen_key(g: &mut Gen) -> String {
    let key = String::arbitrary(g);
    if key == "/" { String::from("slash") } else { key }
}

fn gen_big_int(g: &mut Gen) -> BigInt {
    let n = BigInt::from(i64::arbitrary(g));
    if bool::arbitrary(g) {
        n * BigInt::from(u64::MAX) * BigInt::from(u64::MAX)
    } else {
        n
    }
}

fn gen_scalar(g: &mut Gen) -> Value {
    match usize::arbitrary(g) % 7 {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => Value::Integer(gen_big_int(g)),
        3 => Value::Float(FiniteFloat::arbitrary(g).0),
        4 => Value::String(String::arbitrary(g)),
        5 => Value::Bytes(Vec::arbitrary(g)),
        _ => Value::Link(gen_cid(g)),
    }
}

fn gen_val(g: &mut Gen, depth: usize) -> Value {
    if depth == 0 {
        return gen_scalar(g);
    }
    match usize::arbitrary(g) % 4 {
        0 | 1 => gen_scalar(g),
        2 => {
            let len = usize::arbitrary(g) % 4;
            Value::List((0..len).map(|_| gen_val(g, depth - 1)).collect::<List>())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = Map::new();
            for _ in 0..len {
                map.insert(gen_key(g), gen_val(g, depth - 1));
            }
            Value::Map(map)
        }
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 4;
        gen_val(g, depth)
    }
}
