use serde::{Serialize, Deserialize};

/// One stochastic S/I/R trajectory: event times paired with the compartment
/// counts right after each event. Times are strictly increasing, the first
/// entry carries the initial condition.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Trajectory{
    pub times: Vec<f64>,
    pub sus: Vec<u32>,
    pub inf: Vec<u32>,
    pub rec: Vec<u32>,
}

impl Trajectory{
    pub fn new() -> Self{
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self{
        Self{
            times: Vec::with_capacity(capacity),
            sus: Vec::with_capacity(capacity),
            inf: Vec::with_capacity(capacity),
            rec: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize{
        self.times.len()
    }

    pub fn is_empty(&self) -> bool{
        self.times.is_empty()
    }

    pub fn push(&mut self, time: f64, sus: u32, inf: u32, rec: u32){
        debug_assert!(
            self.times.last().map_or(true, |&last| time > last),
            "trajectory times must be strictly increasing"
        );
        self.times.push(time);
        self.sus.push(sus);
        self.inf.push(inf);
        self.rec.push(rec);
    }

    pub fn start_time(&self) -> Option<f64>{
        self.times.first().copied()
    }

    pub fn final_recovered(&self) -> u32{
        self.rec.last().copied().unwrap_or(0)
    }

    pub fn final_infected(&self) -> u32{
        self.inf.last().copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests{
    use super::*;

    #[test]
    fn final_counts_track_last_point(){
        let mut trajectory = Trajectory::new();
        assert_eq!(trajectory.final_recovered(), 0);

        trajectory.push(0.0, 5, 1, 0);
        trajectory.push(0.3, 4, 2, 0);
        trajectory.push(1.1, 4, 1, 1);

        assert_eq!(trajectory.len(), 3);
        assert_eq!(trajectory.start_time(), Some(0.0));
        assert_eq!(trajectory.final_recovered(), 1);
        assert_eq!(trajectory.final_infected(), 1);
    }
}
