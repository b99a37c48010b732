multiversx_sc::imports!();

/// LP shares locked on the zero address by the first mint
pub const MINIMUM_LIQUIDITY: u64 = 1_000;

/// Fixed-point unit used for stable-curve normalisation and indices
pub const PRECISION: u64 = 1_000_000_000_000_000_000;

const MAX_NEWTON_ITERATIONS: usize = 255;

pub fn precision<M: ManagedTypeApi>() -> BigUint<M> {
    BigUint::from(PRECISION)
}

pub fn decimals_scale<M: ManagedTypeApi>(decimals: u32) -> BigUint<M> {
    BigUint::from(10u64).pow(decimals)
}

/// Pool invariant. Variable pools: x * y. Stable pools: x³y + y³x on
/// reserves normalised to 18 decimals, divided down to 18 decimals.
pub fn k_value<M: ManagedTypeApi>(
    x: &BigUint<M>,
    y: &BigUint<M>,
    stable: bool,
    decimals_x: u32,
    decimals_y: u32,
) -> BigUint<M> {
    if !stable {
        return x * y;
    }

    let one = precision::<M>();
    let x = x * &one / decimals_scale::<M>(decimals_x);
    let y = y * &one / decimals_scale::<M>(decimals_y);
    let a = &x * &y / &one;
    let b = (&x * &x / &one) + (&y * &y / &one);
    a * b / one
}

/// x0·y³ + x0³·y, all terms in 18-decimal fixed point.
fn curve<M: ManagedTypeApi>(x0: &BigUint<M>, y: &BigUint<M>) -> BigUint<M> {
    let one = precision::<M>();
    let y3 = y * y / &one * y / &one;
    let x3 = x0 * x0 / &one * x0 / &one;
    (x0 * &y3 / &one) + (x3 * y / &one)
}

/// d(curve)/dy
fn curve_derivative<M: ManagedTypeApi>(x0: &BigUint<M>, y: &BigUint<M>) -> BigUint<M> {
    let one = precision::<M>();
    let y2 = y * y / &one;
    let x3 = x0 * x0 / &one * x0 / &one;
    (x0 * 3u64 * &y2 / &one) + x3
}

/// Newton solve for y such that curve(x0, y) >= xy with y minimal.
/// Never rounds below the invariant, so the post-swap k check holds.
pub fn get_y<M: ManagedTypeApi>(
    x0: &BigUint<M>,
    xy: &BigUint<M>,
    y_start: &BigUint<M>,
) -> Option<BigUint<M>> {
    let one = precision::<M>();
    let mut y = y_start.clone();

    for _ in 0..MAX_NEWTON_ITERATIONS {
        let k = curve(x0, &y);
        let d = curve_derivative(x0, &y);
        if d == 0u64 {
            return None;
        }

        if k < *xy {
            let mut dy = (xy - &k) * &one / &d;
            if dy == 0u64 {
                if k == *xy {
                    return Some(y);
                }
                let next = &y + &BigUint::from(1u64);
                if curve(x0, &next) > *xy {
                    return Some(next);
                }
                dy = BigUint::from(1u64);
            }
            y += &dy;
        } else {
            let mut dy = (&k - xy) * &one / &d;
            if dy == 0u64 {
                if k == *xy || y == 0u64 {
                    return Some(y);
                }
                let prev = &y - &BigUint::from(1u64);
                if curve(x0, &prev) < *xy {
                    return Some(y);
                }
                dy = BigUint::from(1u64);
            }
            if dy >= y {
                return None;
            }
            y -= &dy;
        }
    }

    None
}

/// Output for an already fee-reduced input. None when the stable solver
/// fails to converge.
pub fn get_amount_out<M: ManagedTypeApi>(
    amount_in: &BigUint<M>,
    reserve_in: &BigUint<M>,
    reserve_out: &BigUint<M>,
    stable: bool,
    decimals_in: u32,
    decimals_out: u32,
) -> Option<BigUint<M>> {
    if amount_in == &0u64 || reserve_in == &0u64 || reserve_out == &0u64 {
        return Some(BigUint::zero());
    }

    if !stable {
        return Some(amount_in * reserve_out / &(reserve_in + amount_in));
    }

    let one = precision::<M>();
    let scale_in = decimals_scale::<M>(decimals_in);
    let scale_out = decimals_scale::<M>(decimals_out);

    let xy = k_value(reserve_in, reserve_out, true, decimals_in, decimals_out);
    let r_in = reserve_in * &one / &scale_in;
    let r_out = reserve_out * &one / &scale_out;
    let a_in = amount_in * &one / &scale_in;

    let y = get_y(&(a_in + &r_in), &xy, &r_out)?;
    if y >= r_out {
        return Some(BigUint::zero());
    }
    Some((r_out - y) * scale_out / one)
}

/// Amount of B matching `amount_a` at the current reserve ratio.
pub fn quote_optimal<M: ManagedTypeApi>(
    amount_a: &BigUint<M>,
    reserve_a: &BigUint<M>,
    reserve_b: &BigUint<M>,
) -> BigUint<M> {
    amount_a * reserve_b / reserve_a
}
