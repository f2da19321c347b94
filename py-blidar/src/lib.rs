mod conversions;
mod sensors;

use pyo3::prelude::*;

#[pymodule]
#[pyo3(name = "blidar")]
fn blidar_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<sensors::SensorConfig>()?;
    m.add_function(wrap_pyfunction!(sensors::beam_angles, m)?)?;
    m.add_function(wrap_pyfunction!(sensors::sweep_mesh, m)?)?;
    m.add_function(wrap_pyfunction!(sensors::write_csv, m)?)?;
    Ok(())
}
