use iopmp_core::soc::traits::RegisterAccess;
use mockall::mock;

mock! {
    pub Registers {}
    impl RegisterAccess for Registers {
        fn read_u64(&mut self, offset: u64) -> u64;
        fn write_u64(&mut self, offset: u64, val: u64);
    }
}
