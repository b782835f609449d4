// Shared helpers for codegauge integration tests
#![allow(dead_code)]

use codegauge::{analyze, AnalysisConfig, AnalysisReport, MetricsRecord, SourceInput};

/// Analyze `(path, text)` pairs, deriving each language from the extension.
pub fn analyze_sources(sources: &[(&str, &str)], config: &AnalysisConfig) -> AnalysisReport {
    let inputs: Vec<SourceInput> = sources
        .iter()
        .map(|(path, text)| SourceInput::from_path(*path, *text))
        .collect();
    analyze(&inputs, config).expect("analysis should succeed")
}

pub fn analyze_default(sources: &[(&str, &str)]) -> AnalysisReport {
    analyze_sources(sources, &AnalysisConfig::default())
}

pub fn record<'a>(report: &'a AnalysisReport, name: &str) -> &'a MetricsRecord {
    report
        .record(name)
        .unwrap_or_else(|| panic!("no record for `{name}`"))
}

pub const SAMPLE_C: &str = r#"#include <stdio.h>

// Function to calculate sum of array
int sumArray(int arr[], int size) {
    int sum = 0;
    for(int i = 0; i < size; i++) {
        sum += arr[i];
    }
    return sum;
}

// Function with nested loops
void printPairs(int arr[], int size) {
    for(int i = 0; i < size; i++) {
        for(int j = 0; j < size; j++) {
            printf("Pair: %d, %d\n", arr[i], arr[j]);
        }
    }
}

// Function that is unused
void unusedFunction() {
    printf("This function is never called.\n");
}

int main() {
    int numbers[5] = {1,2,3,4,5};
    printf("Sum: %d\n", sumArray(numbers, 5));
    printPairs(numbers, 5);
    return 0;
}
"#;
