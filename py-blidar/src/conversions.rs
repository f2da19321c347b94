use blidar::{Matrix4, Point3};
use numpy::ndarray::{Array2, ArrayView2};
use pyo3::exceptions::PyValueError;
use pyo3::PyResult;

pub fn array2_to_points3(array: &ArrayView2<'_, f64>) -> PyResult<Vec<Point3>> {
    let shape = array.shape();
    if shape[1] != 3 {
        return Err(PyValueError::new_err("Expected Nx3 array of points"));
    }

    Ok(array
        .rows()
        .into_iter()
        .map(|row| Point3::new(row[0], row[1], row[2]))
        .collect())
}

pub fn array2_to_faces(array: &ArrayView2<'_, u32>) -> PyResult<Vec<[u32; 3]>> {
    let shape = array.shape();
    if shape[1] != 3 {
        return Err(PyValueError::new_err("Expected Nx3 array of triangle indices"));
    }

    Ok(array
        .rows()
        .into_iter()
        .map(|row| [row[0], row[1], row[2]])
        .collect())
}

pub fn array2_to_matrix4(array: &ArrayView2<'_, f64>) -> PyResult<Matrix4> {
    if array.nrows() != 4 || array.ncols() != 4 {
        return Err(PyValueError::new_err("Expected a 4x4 transformation matrix"));
    }

    Ok(Matrix4::from_fn(|r, c| array[[r, c]]))
}

pub fn points_to_array3(points: &[Point3]) -> Array2<f64> {
    Array2::from_shape_fn((points.len(), 3), |(i, j)| points[i][j])
}
