/// Non-negative money value in the smallest indivisible currency unit.
pub type Amount = u64;

/// Signed money value: positive means owed to the holder, negative means owed
/// by the holder.
///
/// Wide enough that summing any number of `Amount` differences realistic for a
/// ledger cannot overflow.
pub type Balance = i128;

/// Signed difference `paid - owed` for a single entry.
pub fn net(paid: Amount, owed: Amount) -> Balance {
    Balance::from(paid) - Balance::from(owed)
}
