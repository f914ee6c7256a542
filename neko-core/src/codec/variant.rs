use crate::{CodecError, Input, Output};

/// One decode attempt for a sum-type arm: construct the enclosing enum's
/// variant from whatever `I`'s cursor is currently pointing at, or fail
/// without having consumed anything durable (callers must leave the
/// cursor such that [`crate::Input::rollback_item`] makes the next arm's
/// attempt see the same element).
pub type VariantArm<I, R> = fn(&mut I) -> Result<R, <I as Input>::Error>;

/// Sum type / discriminated union (§4.3 table), encode half: the caller
/// already knows which variant it holds (Rust's `match` makes that static,
/// unlike the `std::variant` this is modeled on), so this simply runs the
/// chosen arm's writer. Kept as a named entry point — rather than having
/// the derive macro call the inner encoder directly — so every sum-type
/// encode goes through one place if cross-cutting behavior (e.g. a future
/// debug-mode invariant check) is ever needed.
pub fn encode_variant<O: Output>(
    out: &mut O,
    write: impl FnOnce(&mut O) -> Result<(), O::Error>,
) -> Result<(), O::Error> {
    write(out)
}

/// Sum type / discriminated union (§4.3 table), decode half: "try each
/// alternative in declared order; the first whose discriminant matches
/// writes its payload" on encode becomes, on decode, "try each
/// alternative; the first that parses wins". Each failed arm rolls the
/// cursor back before the next is attempted.
pub fn decode_variant<I: Input, R>(
    inp: &mut I,
    arms: &[VariantArm<I, R>],
) -> Result<R, I::Error> {
    let mut last_err = None;
    for arm in arms {
        match arm(inp) {
            Ok(v) => return Ok(v),
            Err(e) => {
                inp.rollback_item();
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| CodecError::schema("no variant arm matched the input").into()))
}
