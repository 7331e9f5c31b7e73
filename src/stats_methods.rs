//all the methods of calculating averages and variances of sweep samples

use serde::{Serialize, Deserialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MyVariance
{
    pub mean: f64,
    pub var: f64
}

impl MyVariance{

    pub fn mean(&self) -> f64
    {
        self.mean
    }

    pub fn variance_of_mean(&self) -> f64
    {
        self.var
    }

    pub fn from_slice(slice: &[f64], frac: Option<f64>) -> Self
    {
        let mean = calc_average(slice, frac);
        let var = calc_variance(slice, mean, frac);
        Self{
            mean,
            var
        }
    }
}

pub fn calc_average(slice: &[f64], frac: Option<f64>) -> f64
{
    let sum: f64 = slice.iter().sum();
    let res = sum / slice.len() as f64;
    match frac{
        None => res,
        Some(f) => res / f
    }
}

pub fn calc_variance(slice: &[f64], average: f64, frac: Option<f64>) -> f64
{
    let mut var_sum = 0.0;

    match frac{
        None => {
            for &val in slice{
                let dif = average - val;
                var_sum += dif * dif;
            }
        },
        Some(v) => {
            for &val in slice{
                let dif = average - val / v;
                var_sum += dif * dif;
            }
        }
    }

    var_sum / slice.len() as f64
}

#[cfg(test)]
mod tests{
    use super::*;

    #[test]
    fn mean_and_variance(){
        let stats = MyVariance::from_slice(&[1.0, 3.0, 5.0, 7.0], None);
        assert_eq!(stats.mean(), 4.0);
        assert_eq!(stats.variance_of_mean(), 5.0);
    }

    #[test]
    fn fraction_normalization(){
        let stats = MyVariance::from_slice(&[10.0, 10.0], Some(100.0));
        assert_eq!(stats.mean(), 0.1);
        assert_eq!(stats.variance_of_mean(), 0.0);
    }
}
