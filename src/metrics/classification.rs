//! Classification metrics for the disease / no-disease classifier
//!
//! Label 1 (disease present) is the positive class throughout.

use ndarray::Array1;

/// Confusion matrix for binary classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    /// Disease predicted, disease present
    pub tp: usize,
    /// Healthy predicted, healthy
    pub tn: usize,
    /// Disease predicted, healthy
    pub fp: usize,
    /// Healthy predicted, disease present
    pub fn_: usize,
}

impl ConfusionMatrix {
    /// Calculate confusion matrix from predictions
    pub fn from_predictions(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let mut cm = Self::default();

        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t >= 0.5, p >= 0.5) {
                (true, true) => cm.tp += 1,
                (false, false) => cm.tn += 1,
                (false, true) => cm.fp += 1,
                (true, false) => cm.fn_ += 1,
            }
        }

        cm
    }

    /// Total samples
    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    pub fn display(&self) -> String {
        format!(
            "Confusion Matrix:\n\
             \n\
             Predicted:    0       1\n\
             Actual 0:   {:>5}   {:>5}  (TN/FP)\n\
             Actual 1:   {:>5}   {:>5}  (FN/TP)\n",
            self.tn, self.fp, self.fn_, self.tp
        )
    }
}

/// `num / denom`, or 0 when the denominator is empty
fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

/// Share of predictions matching the true label
pub fn accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let cm = ConfusionMatrix::from_predictions(y_true, y_pred);
    ratio(cm.tp + cm.tn, cm.total())
}

/// Collection of classification metrics
#[derive(Debug, Clone)]
pub struct ClassificationMetrics {
    pub confusion_matrix: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    /// Recall (sensitivity)
    pub recall: f64,
    pub f1: f64,
    pub specificity: f64,
    /// AUC-ROC (if probabilities provided)
    pub auc_roc: Option<f64>,
}

impl ClassificationMetrics {
    /// Calculate all metrics from binary predictions
    pub fn calculate(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        Self::calculate_with_proba(y_true, y_pred, None)
    }

    /// Calculate metrics with probability predictions for AUC
    pub fn calculate_with_proba(
        y_true: &Array1<f64>,
        y_pred: &Array1<f64>,
        y_proba: Option<&Array1<f64>>,
    ) -> Self {
        let cm = ConfusionMatrix::from_predictions(y_true, y_pred);

        let precision = ratio(cm.tp, cm.tp + cm.fp);
        let recall = ratio(cm.tp, cm.tp + cm.fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            confusion_matrix: cm,
            accuracy: ratio(cm.tp + cm.tn, cm.total()),
            precision,
            recall,
            f1,
            specificity: ratio(cm.tn, cm.tn + cm.fp),
            auc_roc: y_proba.map(|p| Self::auc_roc(y_true, p)),
        }
    }

    /// AUC-ROC by the trapezoid rule over score-sorted samples
    fn auc_roc(y_true: &Array1<f64>, y_proba: &Array1<f64>) -> f64 {
        let mut pairs: Vec<(f64, bool)> = y_proba
            .iter()
            .zip(y_true.iter())
            .map(|(&p, &t)| (p, t >= 0.5))
            .collect();

        // Sort by prediction descending
        pairs.sort_by(|a, b| b.0.total_cmp(&a.0));

        let n_pos = pairs.iter().filter(|(_, t)| *t).count() as f64;
        let n_neg = pairs.len() as f64 - n_pos;

        if n_pos == 0.0 || n_neg == 0.0 {
            return 0.5;
        }

        let mut tpr_prev = 0.0;
        let mut fpr_prev = 0.0;
        let mut auc = 0.0;
        let mut tp = 0.0;
        let mut fp = 0.0;

        let n = pairs.len();
        let mut i = 0;
        while i < n {
            // Group tied scores
            let score = pairs[i].0;
            let mut j = i;
            while j < n && (pairs[j].0 - score).abs() < 1e-10 {
                if pairs[j].1 {
                    tp += 1.0;
                } else {
                    fp += 1.0;
                }
                j += 1;
            }

            let tpr = tp / n_pos;
            let fpr = fp / n_neg;
            auc += (fpr - fpr_prev) * (tpr + tpr_prev) / 2.0;

            tpr_prev = tpr;
            fpr_prev = fpr;
            i = j;
        }

        auc
    }

    /// Print a summary report
    pub fn report(&self) -> String {
        let mut s = String::new();
        s.push_str("Classification Metrics Report\n");
        s.push_str("=============================\n\n");
        s.push_str(&self.confusion_matrix.display());
        s.push_str("\nMetrics:\n");
        s.push_str(&format!("  Accuracy:    {:.4}\n", self.accuracy));
        s.push_str(&format!("  Precision:   {:.4}\n", self.precision));
        s.push_str(&format!("  Recall:      {:.4}\n", self.recall));
        s.push_str(&format!("  F1 Score:    {:.4}\n", self.f1));
        s.push_str(&format!("  Specificity: {:.4}\n", self.specificity));

        if let Some(auc) = self.auc_roc {
            s.push_str(&format!("  AUC-ROC:     {:.4}\n", auc));
        }

        s
    }
}
