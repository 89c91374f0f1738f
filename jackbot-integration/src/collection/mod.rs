/// [`NoneOneOrTwo`](none_one_or_two::NoneOneOrTwo) collection holding at most two items.
pub mod none_one_or_two;
