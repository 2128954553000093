use crate::math::matrix::Matrix;

/// Number of digit classes; the length of every one-hot label.
pub const CLASS_COUNT: usize = 10;

/// One labeled example: a pixel column vector and a one-hot label column.
#[derive(Debug, Clone)]
pub struct Sample {
    input: Matrix,
    label: Matrix,
}

impl Sample {
    pub fn new(input: Matrix, label: Matrix) -> Sample {
        Sample { input, label }
    }

    /// Builds a sample from raw input values and a class index.
    pub fn with_class(input: Vec<f64>, class: usize, class_count: usize) -> Sample {
        Sample {
            input: Matrix::from_column_vector(input),
            label: one_hot(class, class_count),
        }
    }

    pub fn input(&self) -> &Matrix {
        &self.input
    }

    pub fn label(&self) -> &Matrix {
        &self.label
    }

    /// Index of the hot entry in the label.
    pub fn class(&self) -> usize {
        self.label.max_element().map(|e| e.row).unwrap_or(0)
    }
}

/// A `class_count x 1` column with a single 1.0 at `class`.
pub fn one_hot(class: usize, class_count: usize) -> Matrix {
    let mut vec = Matrix::zeros(class_count, 1);
    vec.set(class, 0, 1.0);
    vec
}
