pub mod checkout;
pub mod listing_edit;
pub mod quote;
