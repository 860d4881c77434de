//! Static guidance templates rendered when no model reply is available.

use crate::coach::fallback::context::TemplateContext;

/// Reply used when the service withheld output for overlap with source material.
pub const RECITATION_NOTICE: &str = "I wasn't able to put together a complete answer to that one. \
Could you narrow the question a little? For example, ask about a single account type \
(like a Roth IRA or a 401(k)), a savings target for your age, or one step of your retirement plan.";

/// Step-by-step retirement roadmap.
#[must_use]
pub fn retirement_roadmap(ctx: &TemplateContext) -> String {
    format!(
        "## Your Retirement Roadmap\n\n\
At age {age}, you have about {years} years until a target retirement age of {target}. \
Here is a step-by-step plan:\n\n\
**Immediate actions (this month)**\n\
- Enroll in your employer's retirement plan and contribute at least enough to earn the full match\n\
- Open a Roth IRA if you are eligible\n\
- Start an emergency fund, even a small one\n\n\
**Next 3-6 months**\n\
- Work up to saving 15% of your income, about {monthly} per month with {income}\n\
- Set an allocation of roughly {stock}% stocks and {bond}% bonds using low-cost index funds\n\n\
**Next 1-2 years**\n\
- Raise your contribution by 1% every year or with every raise\n\
- Pay down any high-interest balances\n\n\
**Ongoing**\n\
- Rebalance once a year\n\
- Revisit the plan after major life events\n\n\
Which of these steps would you like to work through first?",
        age = ctx.age_label(),
        years = ctx.years_to_retirement,
        target = ctx.target_age,
        monthly = ctx.monthly_savings,
        income = ctx.income_phrase(),
        stock = ctx.stock_percent,
        bond = ctx.bond_percent,
    )
}

/// Monthly budgeting guidance.
#[must_use]
pub fn budget(ctx: &TemplateContext) -> String {
    format!(
        "## Building a Budget That Leaves Room for Retirement\n\n\
A simple starting point with {income} is the 50/30/20 rule:\n\n\
- **50% needs**: rent or mortgage, utilities, groceries, insurance, minimum payments\n\
- **30% wants**: dining out, entertainment, travel\n\
- **20% future you**: retirement savings, emergency fund, extra payments on balances\n\n\
**Tips to make it stick**\n\
- Track every expense for one month before changing anything\n\
- Automate retirement contributions so they leave your account on payday\n\
- Aim for about {monthly} per month toward retirement\n\
- Keep housing costs near 30% of take-home pay\n\n\
Would you like help sorting your current expenses into these three groups?",
        income = ctx.income_phrase(),
        monthly = ctx.monthly_savings,
    )
}

/// Paying down balances while still saving.
#[must_use]
pub fn debt(ctx: &TemplateContext) -> String {
    format!(
        "## Paying Down Balances While Saving for Retirement\n\n\
You don't have to choose one or the other. A balanced approach at age {age}:\n\n\
1. **Keep the employer match**: contribute enough to earn the full match, since it is an immediate return\n\
2. **List every balance** with its interest rate and minimum payment\n\
3. **Pick a payoff method**:\n\
   - *Avalanche*: extra money goes to the highest interest rate first and saves the most\n\
   - *Snowball*: extra money goes to the smallest balance first and builds momentum\n\
4. **Student loans**: look into income-driven repayment and any forgiveness programs you qualify for\n\
5. **After high-interest balances are gone**, redirect those payments to retirement savings\n\n\
Would you like help ordering your balances or estimating a payoff date?",
        age = ctx.age_label(),
    )
}

/// How much to save each month.
#[must_use]
pub fn savings_target(ctx: &TemplateContext) -> String {
    format!(
        "## How Much Should You Save?\n\n\
At age {age}, a common target is to save **10% to 15%** of your gross income for retirement, \
including any employer match. With {income}, that works out to about **{monthly} per month**.\n\n\
**Milestones to aim for**\n\
- 1x your salary saved by 30\n\
- 3x by 40\n\
- 6x by 50\n\
- 10x by 67\n\n\
**If 15% feels out of reach**\n\
- Start with whatever earns the full employer match\n\
- Increase your rate by 1% each year until you reach 15%\n\
- Put part of every raise or bonus straight into savings\n\n\
You have about {years} years until age {target}. Would you like to see how your current savings compare to these milestones?",
        age = ctx.age_label(),
        income = ctx.income_phrase(),
        monthly = ctx.monthly_savings,
        years = ctx.years_to_retirement,
        target = ctx.target_age,
    )
}

/// Account types and allocation.
#[must_use]
pub fn investment_allocation(ctx: &TemplateContext) -> String {
    format!(
        "## Choosing Accounts and an Allocation\n\n\
**Account order that works for most people**\n\
1. 401(k) or 403(b) up to the full employer match\n\
2. HSA, if you have a high-deductible health plan (triple tax advantage)\n\
3. Roth IRA, if your income allows: tax-free growth and withdrawals in retirement\n\
4. Back to the 401(k) up to the annual limit\n\
5. A taxable brokerage account after that\n\n\
**Allocation at age {age}**\n\
A common rule of thumb suggests about **{stock}% stocks** and **{bond}% bonds**. \
Broad, low-cost index funds, or a target-date fund for a retirement about {years} years away, keep this simple.\n\n\
Rebalance once a year to stay on target. Would you like to go deeper on any of these accounts?",
        age = ctx.age_label(),
        stock = ctx.stock_percent,
        bond = ctx.bond_percent,
        years = ctx.years_to_retirement,
    )
}

/// Building an emergency fund.
#[must_use]
pub fn emergency_fund(ctx: &TemplateContext) -> String {
    format!(
        "## Building Your Emergency Fund\n\n\
An emergency fund keeps a surprise expense from derailing your retirement savings.\n\n\
- **Target**: 3 to 6 months of essential expenses\n\
- **Starter goal**: $1,000, then build from there\n\
- **Where to keep it**: a high-yield savings account, separate from everyday checking\n\
- **How to build it**: automate a fixed transfer each payday, even a small one\n\n\
With {income}, splitting new savings between this fund and your retirement account \
(about {monthly} per month toward retirement) keeps both moving.\n\n\
How many months of expenses do you have set aside today?",
        income = ctx.income_phrase(),
        monthly = ctx.monthly_savings,
    )
}

/// Growing income and skills.
#[must_use]
pub fn career(ctx: &TemplateContext) -> String {
    format!(
        "## Growing Your Income and Skills\n\n\
Higher income is one of the strongest levers for retirement. At age {age}:\n\n\
- **Know your market rate**: compare your pay with salary surveys for your role and region\n\
- **Ask for the raise**: bring concrete results and a specific number\n\
- **Close skill gaps**: certifications, workshops or courses in your field often pay for themselves\n\
- **Build financial knowledge**: a personal finance or retirement planning course helps you use each raise well\n\
- **Save the raise**: direct at least half of every increase to retirement savings\n\n\
What stage of your career are you in right now?",
        age = ctx.age_label(),
    )
}

/// Full financial plan overview.
#[must_use]
pub fn financial_plan(ctx: &TemplateContext) -> String {
    format!(
        "## Your Financial Plan\n\n\
Here is a complete plan built on your profile (age {age}, {income}):\n\n\
1. **Cash flow**: follow a 50/30/20 budget and track spending for a month\n\
2. **Safety net**: build 3 to 6 months of expenses in an emergency fund\n\
3. **High-interest balances**: pay them down with the avalanche or snowball method\n\
4. **Retirement savings**: save 10% to 15% of income, about {monthly} per month\n\
5. **Investing**: about {stock}% stocks and {bond}% bonds in low-cost funds\n\
6. **Timeline**: {years} years until your target retirement age of {target}\n\
7. **Review**: revisit the plan every year and after major life changes\n\n\
Which part would you like to turn into specific action steps?",
        age = ctx.age_label(),
        income = ctx.income_phrase(),
        monthly = ctx.monthly_savings,
        stock = ctx.stock_percent,
        bond = ctx.bond_percent,
        years = ctx.years_to_retirement,
        target = ctx.target_age,
    )
}

/// Default guidance when no topic matches.
#[must_use]
pub fn general_guidance(ctx: &TemplateContext) -> String {
    format!(
        "## Retirement Planning Essentials\n\n\
Here are the four areas that matter most, tailored to age {age} and {income}:\n\n\
1. **Savings target**: aim for 10% to 15% of your income, about {monthly} per month\n\
2. **Investment mix**: roughly {stock}% stocks and {bond}% bonds\n\
3. **Emergency fund**: 3 to 6 months of essential expenses\n\
4. **Debt strategy**: keep the employer match while paying down high-interest balances\n\n\
Ask me about any of these, or share more about your situation, and I'll get more specific.",
        age = ctx.age_label(),
        income = ctx.income_phrase(),
        monthly = ctx.monthly_savings,
        stock = ctx.stock_percent,
        bond = ctx.bond_percent,
    )
}
