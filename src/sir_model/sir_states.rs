use serde::{Serialize, Deserialize};

#[derive(Clone, Debug, PartialEq, Eq, Copy)]
#[derive(Serialize, Deserialize)]
pub enum SirState{
    Susceptible,
    Infected,
    Recovered,
}

impl SirState{
    pub fn sus_check(&self) -> bool{
        matches!(self, SirState::Susceptible)
    }
    pub fn inf_check(&self) -> bool{
        matches!(self, SirState::Infected)
    }
    pub fn rec_check(&self) -> bool{
        matches!(self, SirState::Recovered)
    }

    pub fn is_or_was_infected(&self) -> bool
    {
        matches!(self, Self::Infected | Self::Recovered)
    }
}

impl Default for SirState{
    fn default() -> Self{
        SirState::Susceptible
    }
}
