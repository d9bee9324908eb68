//! Provides an example of how to use sumout to combine and sum out factors.
//!
//! The factors describe the classic rain / sprinkler / wet grass network:
//! P(Rain), P(Sprinkler | Rain) and P(Grass Wet | Sprinkler, Rain).

extern crate sumout;

use sumout as s;

fn table(columns: &[&str], records: &[&[&str]]) -> s::TabularData {
    s::TabularData::new(
        columns.iter().map(|c| c.to_string()).collect(),
        records.iter().map(|r| r.iter().map(|v| v.to_string()).collect()).collect()
    )
}

fn main() -> s::Result<()> {

    ///////////////////////////////////////////////////
    // Step 1: Build the factors from tabular data

    let factor_a = s::Factor::construct(table(
        &["Rain", "Value"],
        &[&["True", "0.2"], &["False", "0.8"]]
    ))?;

    let factor_b = s::Factor::construct(table(
        &["Rain", "Sprinkler", "Value"],
        &[
            &["True", "True", "0.01"],
            &["True", "False", "0.99"],
            &["False", "True", "0.4"],
            &["False", "False", "0.6"]
        ]
    ))?;

    let factor_c = s::Factor::construct(table(
        &["Rain", "Sprinkler", "Grass Wet", "Value"],
        &[
            &["True", "True", "True", "0.99"],
            &["True", "True", "False", "0.01"],
            &["True", "False", "True", "0.8"],
            &["True", "False", "False", "0.2"],
            &["False", "True", "True", "0.9"],
            &["False", "True", "False", "0.1"],
            &["False", "False", "True", "0.0"],
            &["False", "False", "False", "1.0"]
        ]
    ))?;

    ///////////////////////////////////////////////////
    // Step 2: Multiply and sum out

    let format = s::TableFormat::default().with_preview_rows(3);

    let product = factor_a.product(&factor_b)?;
    println!("A x B\n{}", product.head_with(&format));

    let summed = factor_c.marginalize(&s::Variable::new("Sprinkler"))?;
    println!("sum_Sprinkler C\n{}", summed.head_with(&format));

    ///////////////////////////////////////////////////
    // Step 3: P(Grass Wet) by variable elimination

    let order = vec![s::Variable::new("Rain"), s::Variable::new("Sprinkler")];
    let wet = s::eliminate(vec![factor_a, factor_b, factor_c], &order)?;
    println!("P(Grass Wet)\n{}", wet);

    ///////////////////////////////////////////////////
    // Step 4: Save the results

    let dir = std::env::temp_dir();
    product.save_with(dir.join("product.csv"), &format)?;
    summed.save_with(dir.join("summation.csv"), &format)?;
    println!("saved results to {}", dir.display());

    Ok(())
}
