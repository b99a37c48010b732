pub const ERR_UNAUTHORIZED: &str = "ERR_UNAUTHORIZED";
pub const ERR_PAUSED: &str = "ERR_PAUSED";
pub const ERR_INVALID_AMOUNT: &str = "ERR_INVALID_AMOUNT";
pub const ERR_INVALID_ADDRESS: &str = "ERR_INVALID_ADDRESS";
pub const ERR_INVALID_BPS: &str = "ERR_INVALID_BPS";
pub const ERR_INVALID_FEE: &str = "ERR_INVALID_FEE";
pub const ERR_INVALID_TOKEN: &str = "ERR_INVALID_TOKEN";
pub const ERR_INVALID_PAYMENT: &str = "ERR_INVALID_PAYMENT";
pub const ERR_DEADLINE: &str = "ERR_DEADLINE";
pub const ERR_SLIPPAGE: &str = "ERR_SLIPPAGE";
pub const ERR_INSUFFICIENT_BALANCE: &str = "ERR_INSUFFICIENT_BALANCE";

// Pairs
pub const ERR_PAIR_NOT_FOUND: &str = "ERR_PAIR_NOT_FOUND";
pub const ERR_PAIR_EXISTS: &str = "ERR_PAIR_EXISTS";
pub const ERR_IDENTICAL_TOKENS: &str = "ERR_IDENTICAL_TOKENS";
pub const ERR_INVALID_DECIMALS: &str = "ERR_INVALID_DECIMALS";
pub const ERR_INSUFFICIENT_LIQUIDITY: &str = "ERR_INSUFFICIENT_LIQUIDITY";
pub const ERR_K: &str = "ERR_K";
pub const ERR_NO_CONVERGENCE: &str = "ERR_NO_CONVERGENCE";
pub const ERR_NOT_ENOUGH_OBSERVATIONS: &str = "ERR_NOT_ENOUGH_OBSERVATIONS";

// Voting escrow
pub const ERR_LOCK_EXISTS: &str = "ERR_LOCK_EXISTS";
pub const ERR_NO_LOCK: &str = "ERR_NO_LOCK";
pub const ERR_LOCK_EXPIRED: &str = "ERR_LOCK_EXPIRED";
pub const ERR_LOCK_NOT_EXPIRED: &str = "ERR_LOCK_NOT_EXPIRED";
pub const ERR_INVALID_UNLOCK_TIME: &str = "ERR_INVALID_UNLOCK_TIME";

// Voting and distribution
pub const ERR_ALREADY_VOTED: &str = "ERR_ALREADY_VOTED";
pub const ERR_NO_VOTING_POWER: &str = "ERR_NO_VOTING_POWER";
pub const ERR_LENGTH_MISMATCH: &str = "ERR_LENGTH_MISMATCH";
pub const ERR_DUPLICATE_POOL: &str = "ERR_DUPLICATE_POOL";
pub const ERR_GAUGE_EXISTS: &str = "ERR_GAUGE_EXISTS";
pub const ERR_GAUGE_NOT_FOUND: &str = "ERR_GAUGE_NOT_FOUND";
pub const ERR_GAUGE_DEPRECATED: &str = "ERR_GAUGE_DEPRECATED";
pub const ERR_GAUGE_ALIVE: &str = "ERR_GAUGE_ALIVE";
pub const ERR_ALREADY_STAGED: &str = "ERR_ALREADY_STAGED";
pub const ERR_NOT_STAGED: &str = "ERR_NOT_STAGED";
pub const ERR_POKE_TOO_SOON: &str = "ERR_POKE_TOO_SOON";

// Bribes
pub const ERR_BRIBE_TOKEN_NOT_ALLOWED: &str = "ERR_BRIBE_TOKEN_NOT_ALLOWED";
pub const ERR_TOO_MANY_BRIBE_TOKENS: &str = "ERR_TOO_MANY_BRIBE_TOKENS";
