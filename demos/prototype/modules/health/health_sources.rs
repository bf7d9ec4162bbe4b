use spezi::Module;

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub kind: &'static str,
    pub value: f64,
}

#[derive(Debug, Default)]
pub struct StepCountSource;
impl Module for StepCountSource {}
impl StepCountSource {
    pub fn read(&self) -> Sample {
        Sample {
            kind: "steps",
            value: 4_211.0,
        }
    }
}

#[derive(Debug, Default)]
pub struct HeartRateSource;
impl Module for HeartRateSource {}
impl HeartRateSource {
    pub fn read(&self) -> Sample {
        Sample {
            kind: "heart_rate",
            value: 62.0,
        }
    }
}

/// Used instead of the sensors when running without hardware
#[derive(Debug, Default)]
pub struct SimulatedSource;
impl Module for SimulatedSource {}
impl SimulatedSource {
    pub fn read(&self) -> Sample {
        Sample {
            kind: "simulated",
            value: 1.0,
        }
    }
}
