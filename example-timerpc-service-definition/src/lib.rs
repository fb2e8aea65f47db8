pub mod prebuffered;
