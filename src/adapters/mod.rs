pub mod uddoktapay;
