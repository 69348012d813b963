pub mod checkout;

pub type CmdResult<T> = ppcheckout::Result<(T, i32)>;
